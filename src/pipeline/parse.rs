//! Response validation: raw model text → checked menu items.
//!
//! ## Why not deserialize straight into `Vec<MenuItem>`?
//!
//! The model's output is non-deterministic. A direct structural cast would
//! turn "one item has a string where a number belongs" into a wholesale
//! parse failure, or worse, silently accept a shape we never asked for.
//! Instead the text is parsed into a generic JSON value and projected into
//! [`MenuItem`] field-by-field: required fields missing or mistyped reject
//! the response as [`MenuLensError::AnalysisFormat`], optional fields
//! degrade to `None`, and the soft "currency present iff price present"
//! invariant is tolerated rather than enforced.
//!
//! Well-prompted models also still occasionally wrap the array in markdown
//! fences despite the prompt saying not to; those are stripped first.

use crate::error::MenuLensError;
use crate::item::MenuItem;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

static RE_FENCES: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json)?").unwrap());

/// Strip any markdown code-fence markers the model may still emit.
pub fn strip_fences(input: &str) -> String {
    RE_FENCES.replace_all(input, "").trim().to_string()
}

/// Parse model output into menu items, validating the array shape.
pub fn parse_menu_items(text: &str) -> Result<Vec<MenuItem>, MenuLensError> {
    let clean = strip_fences(text);

    let value: Value =
        serde_json::from_str(&clean).map_err(|e| MenuLensError::AnalysisFormat {
            detail: format!("not valid JSON: {e}"),
        })?;

    let entries = value.as_array().ok_or_else(|| MenuLensError::AnalysisFormat {
        detail: format!("expected a JSON array, got {}", json_kind(&value)),
    })?;

    let mut items = Vec::with_capacity(entries.len());
    for (idx, entry) in entries.iter().enumerate() {
        let item = project_item(entry).map_err(|detail| MenuLensError::AnalysisFormat {
            detail: format!("item {idx}: {detail}"),
        })?;
        items.push(item);
    }

    debug!("Parsed {} menu items", items.len());
    Ok(items)
}

/// Project one JSON object into a `MenuItem`.
///
/// Required fields (`name`, `koreanName`) reject on missing/mistyped;
/// optional fields (`description`, `price`, `currency`) degrade to their
/// empty/absent forms.
fn project_item(value: &Value) -> Result<MenuItem, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| format!("expected an object, got {}", json_kind(value)))?;

    let name = obj
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("missing or empty 'name'")?
        .to_string();

    let korean_name = obj
        .get("koreanName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or("missing or empty 'koreanName'")?
        .to_string();

    let description = obj
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .trim()
        .to_string();

    // Optional and tolerant: a zero, negative, or non-numeric price simply
    // means "no determinable price", not a rejected response.
    let price = obj.get("price").and_then(Value::as_f64).filter(|p| *p > 0.0);

    let currency = obj
        .get("currency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(MenuItem {
        name,
        korean_name,
        description,
        price,
        currency,
        converted_price: None,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
