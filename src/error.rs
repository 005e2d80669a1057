//! Error types for the menulens library.
//!
//! Two failure classes exist and they are deliberately kept apart:
//!
//! * [`MenuLensError`] — **Fatal to the current attempt**: the analysis
//!   cannot produce a menu (missing API key, unreachable model, response
//!   that is not a JSON array). Returned as `Err(MenuLensError)` from the
//!   top-level `analyze_*` functions and surfaced by the session as its
//!   user-facing error message.
//!
//! * Rate-lookup failure — **Per-item, non-fatal**: a single item could not
//!   get a converted price. It is never an error variant at all; the
//!   resolver recovers internally (fallback table or `None`) and the item
//!   simply passes through normalization without a `converted_price`.
//!
//! The split mirrors what the user sees: one banner message per failed
//! analysis, but never a failed analysis because one currency was odd.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the menulens library.
#[derive(Debug, Error)]
pub enum MenuLensError {
    // ── Configuration errors ──────────────────────────────────────────────
    /// API credential is missing or still the placeholder value.
    ///
    /// Checked before any network call; not retryable until the
    /// configuration changes.
    #[error("Vision service credential is not configured: {detail}\nSet GEMINI_API_KEY or pass --api-key.")]
    Configuration { detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input image file was not found at the given path.
    #[error("Image file not found: '{path}'\nCheck the path exists and is readable.")]
    ImageNotFound { path: PathBuf },

    /// The image file exists but could not be read.
    #[error("Failed to read image '{path}': {source}")]
    ImageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file was read but its bytes are not a recognised image format.
    #[error("File is not a supported image: '{path}'")]
    NotAnImage { path: PathBuf },

    // ── Analysis errors ───────────────────────────────────────────────────
    /// The vision-language call could not complete (transport failure,
    /// timeout, non-2xx status, or an empty candidate list).
    #[error("Menu analysis request failed: {detail}")]
    AnalysisNetwork { detail: String },

    /// The vision-language call completed but returned content that is not
    /// a parseable JSON array of menu items.
    ///
    /// Distinct from [`MenuLensError::AnalysisNetwork`] because a retry may
    /// genuinely succeed: the model's output is not deterministic.
    #[error("Menu analysis response has an invalid format: {detail}")]
    AnalysisFormat { detail: String },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MenuLensError {
    /// The Korean message shown to the end user for this error.
    ///
    /// The session stores this string, not the technical `Display` output;
    /// the latter goes to the logs.
    pub fn user_message(&self) -> &'static str {
        match self {
            MenuLensError::Configuration { .. } | MenuLensError::InvalidConfig(_) => {
                "API 키가 설정되지 않았습니다. 설정을 확인해 주세요."
            }
            MenuLensError::AnalysisFormat { .. } => "AI 응답 형식이 올바르지 않습니다.",
            MenuLensError::ImageNotFound { .. }
            | MenuLensError::ImageUnreadable { .. }
            | MenuLensError::NotAnImage { .. } => "이미지 파일을 읽을 수 없습니다.",
            MenuLensError::AnalysisNetwork { .. } | MenuLensError::Internal(_) => {
                "메뉴판 분석에 실패했습니다. 다시 시도해 주세요."
            }
        }
    }

    /// True when a retry with the same input could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MenuLensError::AnalysisNetwork { .. }
                | MenuLensError::AnalysisFormat { .. }
                | MenuLensError::Internal(_)
        )
    }
}
