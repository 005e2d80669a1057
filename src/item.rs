//! The menu item data model.

use serde::{Deserialize, Serialize};

/// One dish or drink extracted from a menu photo.
///
/// Produced by the extractor, enriched in place by price normalization.
/// Field names on the wire follow the model contract (camelCase), which is
/// also what the extraction prompt asks the model to emit.
///
/// `currency` is expected to accompany `price`, but that is a soft
/// invariant of the model's output: an item carrying only one of the two is
/// tolerated and simply never receives a `converted_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    /// Original-language menu text. Required, non-empty.
    pub name: String,

    /// Name translated to Korean. Required.
    pub korean_name: String,

    /// Korean description, translated or generated. May be empty.
    #[serde(default)]
    pub description: String,

    /// Listed price in the menu's own currency, if determinable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    /// 3-letter currency code for `price`, identified or inferred.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Price converted to the target currency, rounded to a whole unit.
    /// Absent when `price`/`currency` are absent or the conversion failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_price: Option<u64>,
}

impl MenuItem {
    /// True when this item carries everything normalization needs.
    pub fn is_convertible(&self) -> bool {
        self.price.is_some() && self.currency.is_some()
    }
}

/// Format a whole-unit amount as a Korean won string, e.g. `15,000원`.
pub fn format_krw(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push('원');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramen() -> MenuItem {
        MenuItem {
            name: "Ramen".into(),
            korean_name: "라멘".into(),
            description: "진한 돼지뼈 육수의 라멘".into(),
            price: Some(900.0),
            currency: Some("JPY".into()),
            converted_price: None,
        }
    }

    #[test]
    fn convertible_requires_price_and_currency() {
        let mut item = ramen();
        assert!(item.is_convertible());
        item.currency = None;
        assert!(!item.is_convertible());
        item.currency = Some("JPY".into());
        item.price = None;
        assert!(!item.is_convertible());
    }

    #[test]
    fn serializes_with_camel_case_wire_names() {
        let mut item = ramen();
        item.converted_price = Some(8100);
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["koreanName"], "라멘");
        assert_eq!(json["convertedPrice"], 8100);
        assert!(json.get("korean_name").is_none());
    }

    #[test]
    fn absent_optionals_are_omitted_from_json() {
        let item = MenuItem {
            name: "Pan".into(),
            korean_name: "빵".into(),
            description: String::new(),
            price: None,
            currency: None,
            converted_price: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("price").is_none());
        assert!(json.get("currency").is_none());
        assert!(json.get("convertedPrice").is_none());
    }

    #[test]
    fn format_krw_groups_thousands() {
        assert_eq!(format_krw(0), "0원");
        assert_eq!(format_krw(900), "900원");
        assert_eq!(format_krw(8100), "8,100원");
        assert_eq!(format_krw(20150), "20,150원");
        assert_eq!(format_krw(1234567), "1,234,567원");
    }
}
