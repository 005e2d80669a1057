//! Image encoding: raw bytes → base64 inline data for the vision request.
//!
//! The Gemini API accepts images as base64 strings embedded in the JSON
//! request body (`inline_data`). The photo is sent exactly as uploaded —
//! no re-encoding or resizing — so the model sees the same pixels the user
//! photographed.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// A base64-encoded image ready for the multimodal request body.
#[derive(Debug, Clone)]
pub struct InlineImage {
    /// Base64-encoded image bytes.
    pub data: String,
    /// MIME type of the original bytes, e.g. `image/jpeg`.
    pub mime_type: String,
}

/// Encode image bytes as base64 inline data.
pub fn encode_image(bytes: &[u8], mime_type: &str) -> InlineImage {
    let data = STANDARD.encode(bytes);
    debug!("Encoded image → {} bytes base64 ({})", data.len(), mime_type);
    InlineImage {
        data,
        mime_type: mime_type.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_round_trips() {
        let bytes = [0xFFu8, 0xD8, 0xFF, 0xE0, 0x00, 0x10];
        let inline = encode_image(&bytes, "image/jpeg");
        assert_eq!(inline.mime_type, "image/jpeg");
        let decoded = STANDARD.decode(&inline.data).expect("valid base64");
        assert_eq!(decoded, bytes);
    }

    #[test]
    fn encode_empty_input_is_empty_data() {
        let inline = encode_image(&[], "image/png");
        assert!(inline.data.is_empty());
    }
}
