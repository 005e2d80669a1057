//! Instruction prompt for the menu-analysis vision call.
//!
//! Centralising the prompt here keeps the request-building code in
//! [`crate::pipeline::vision`] free of prompt engineering, and lets unit
//! tests inspect the instructions without a live model. Callers can
//! override it via [`crate::config::AnalysisConfig::prompt`].

/// Default instruction prompt for extracting and translating a menu photo.
///
/// The response-shape rules at the end are load-bearing: downstream
/// parsing expects a bare JSON array with exactly these field names and
/// tolerates (but does not rely on) the model still wrapping the array in
/// markdown fences.
pub const MENU_ANALYSIS_PROMPT: &str = r#"Analyze this restaurant menu image.
Identify all the menu items, their descriptions (if available), and prices.

1. EXTRACT the original text for the menu item name.
2. TRANSLATE the description to KOREAN. If there is no description, create a
   short appetizing description in Korean based on the menu name.
3. IDENTIFY the price and the currency. Estimate the currency from the
   language/location context if symbols are missing (e.g. Japanese text -> JPY,
   English/$ -> USD, European -> EUR).

Return the response ONLY as a valid JSON array of objects.

Each object must have the following structure:
{
  "name": "Original menu name (in original language)",
  "koreanName": "Menu name translated to Korean",
  "description": "Appetizing description in Korean",
  "price": number (e.g. 15.50, 1200),
  "currency": "Currency code (USD, EUR, JPY, KRW, etc.)"
}

Do not include any markdown formatting (like ```json). Just the raw JSON string."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_demands_a_bare_json_array() {
        assert!(MENU_ANALYSIS_PROMPT.contains("JSON array"));
        assert!(MENU_ANALYSIS_PROMPT.contains("koreanName"));
        assert!(MENU_ANALYSIS_PROMPT.contains("currency"));
    }
}
