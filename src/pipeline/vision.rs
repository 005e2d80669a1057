//! Vision-language extraction: one multimodal request per analysis.
//!
//! This module owns the only model network I/O in the pipeline. It is
//! intentionally thin — prompt text lives in [`crate::prompts`], response
//! validation in [`crate::pipeline::parse`] — so the request plumbing can
//! change without touching either.
//!
//! The service sits behind the [`VisionModel`] trait. Production uses
//! [`GeminiClient`]; tests inject a counting mock to prove, among other
//! things, that a missing credential never reaches the network.
//!
//! There are no retries here. The model's output is non-deterministic and
//! an analysis is a user-visible action, so retrying is a caller-level,
//! user-triggered decision (the session's `retry()`).

use crate::config::AnalysisConfig;
use crate::error::MenuLensError;
use crate::item::MenuItem;
use crate::pipeline::encode::{self, InlineImage};
use crate::pipeline::parse;
use crate::prompts::MENU_ANALYSIS_PROMPT;
use crate::session::MenuImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// A vision-language service that answers one prompt about one image.
///
/// Object-safe so a pre-built instance can ride in
/// [`AnalysisConfig::vision`], mirroring how callers inject test doubles
/// or middleware.
#[async_trait]
pub trait VisionModel: Send + Sync {
    /// Issue exactly one request; return the raw model text.
    async fn generate(&self, prompt: &str, image: &InlineImage) -> Result<String, MenuLensError>;
}

/// Extract menu items from an image via the vision model.
///
/// The credential check comes first and fails without any network call —
/// a misconfigured install must not spend a request to find out.
pub async fn extract_items(
    image: &MenuImage,
    config: &AnalysisConfig,
) -> Result<Vec<MenuItem>, MenuLensError> {
    let credential = config.credential()?;

    let model: Arc<dyn VisionModel> = match config.vision {
        Some(ref vision) => Arc::clone(vision),
        None => Arc::new(GeminiClient::new(
            credential,
            &config.model,
            config.api_timeout_secs,
        )?),
    };

    let inline = encode::encode_image(&image.bytes, &image.mime_type);
    let prompt = config.prompt.as_deref().unwrap_or(MENU_ANALYSIS_PROMPT);

    let start = Instant::now();
    let text = model.generate(prompt, &inline).await?;
    info!(
        "Vision call returned {} chars in {:?}",
        text.len(),
        start.elapsed()
    );

    parse::parse_menu_items(&text)
}

// ── Gemini REST client ───────────────────────────────────────────────────

/// Vision client for the Gemini `generateContent` REST API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, MenuLensError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MenuLensError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
        })
    }
}

#[async_trait]
impl VisionModel for GeminiClient {
    async fn generate(&self, prompt: &str, image: &InlineImage) -> Result<String, MenuLensError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_API_BASE, self.model, self.api_key
        );

        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: prompt.to_string(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type.clone(),
                            data: image.data.clone(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json".to_string(),
            },
        };

        debug!("POST {}:generateContent ({})", self.model, image.mime_type);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| MenuLensError::AnalysisNetwork {
                detail: if e.is_timeout() {
                    "request timed out".to_string()
                } else {
                    e.to_string()
                },
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(MenuLensError::AnalysisNetwork {
                detail: format!("HTTP {status}"),
            });
        }

        let body: GeminiResponse =
            response
                .json()
                .await
                .map_err(|e| MenuLensError::AnalysisNetwork {
                    detail: format!("response body: {e}"),
                })?;

        body.candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.clone())
            .ok_or_else(|| MenuLensError::AnalysisNetwork {
                detail: "empty candidate list".into(),
            })
    }
}

// ── Wire types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType")]
    response_mime_type: String,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ResponseContent,
}

#[derive(Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Mock that records every call and replies with a canned string.
    struct CannedVision {
        calls: AtomicUsize,
        reply: String,
    }

    impl CannedVision {
        fn new(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply: reply.to_string(),
            })
        }
    }

    #[async_trait]
    impl VisionModel for CannedVision {
        async fn generate(
            &self,
            _prompt: &str,
            _image: &InlineImage,
        ) -> Result<String, MenuLensError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn jpeg_image() -> MenuImage {
        MenuImage {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            mime_type: "image/jpeg".into(),
        }
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_call() {
        let mock = CannedVision::new("[]");
        let config = AnalysisConfig {
            api_key: None,
            vision: Some(mock.clone() as Arc<dyn VisionModel>),
            ..AnalysisConfig::default()
        };

        let result = extract_items(&jpeg_image(), &config).await;

        assert!(matches!(result, Err(MenuLensError::Configuration { .. })));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0, "no network call");
    }

    #[tokio::test]
    async fn placeholder_credential_fails_before_any_call() {
        let mock = CannedVision::new("[]");
        let config = AnalysisConfig {
            api_key: Some(crate::config::PLACEHOLDER_API_KEY.into()),
            vision: Some(mock.clone() as Arc<dyn VisionModel>),
            ..AnalysisConfig::default()
        };

        let result = extract_items(&jpeg_image(), &config).await;

        assert!(matches!(result, Err(MenuLensError::Configuration { .. })));
        assert_eq!(mock.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_array_reply_yields_items_with_one_call() {
        let reply = r#"[{"name":"Ramen","koreanName":"라멘","description":"","price":900,"currency":"JPY"}]"#;
        let mock = CannedVision::new(reply);
        let config = AnalysisConfig {
            api_key: Some("test-key".into()),
            vision: Some(mock.clone() as Arc<dyn VisionModel>),
            ..AnalysisConfig::default()
        };

        let items = extract_items(&jpeg_image(), &config).await.unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].korean_name, "라멘");
        assert_eq!(mock.calls.load(Ordering::SeqCst), 1, "exactly one call");
    }

    #[tokio::test]
    async fn non_array_reply_is_a_format_error() {
        let mock = CannedVision::new(r#"{"not": "an array"}"#);
        let config = AnalysisConfig {
            api_key: Some("test-key".into()),
            vision: Some(mock as Arc<dyn VisionModel>),
            ..AnalysisConfig::default()
        };

        let result = extract_items(&jpeg_image(), &config).await;
        assert!(matches!(result, Err(MenuLensError::AnalysisFormat { .. })));
    }

    // ── Wire shape ───────────────────────────────────────────────────────

    #[test]
    fn request_serializes_with_gemini_field_names() {
        let request = GeminiRequest {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: "prompt".into(),
                    },
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: "image/jpeg".into(),
                            data: "base64data".into(),
                        },
                    },
                ],
            }],
            generation_config: GenerationConfig {
                temperature: 0.1,
                response_mime_type: "application/json".into(),
            },
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("\"generationConfig\""));
        assert!(json.contains("\"responseMimeType\":\"application/json\""));
        assert!(json.contains("\"inline_data\""));
        assert!(json.contains("\"mime_type\":\"image/jpeg\""));
    }

    #[test]
    fn response_deserializes_candidate_text() {
        let json = r#"{
            "candidates": [{
                "content": { "parts": [{ "text": "[]" }] }
            }]
        }"#;
        let response: GeminiResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.candidates[0].content.parts[0].text, "[]");
    }

    #[test]
    fn response_tolerates_missing_candidates() {
        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert!(response.candidates.is_empty());
    }
}
