//! # menulens
//!
//! Analyze a foreign-restaurant menu photo with a Vision Language Model and
//! present each dish in Korean, with prices converted to Korean won.
//!
//! ## Why this crate?
//!
//! OCR alone reads menu photos badly — uneven lighting, decorative fonts,
//! mixed scripts, prices written as `¥900` or `9.00€`. Instead this crate
//! sends the photo to a VLM and asks it to read the menu as a human would,
//! returning structured items: the original name, a Korean translation, a
//! short Korean description, and the listed price with its currency. A
//! normalization pass then converts every price to the target currency
//! (KRW by default), falling back to a static rate table when the live
//! rate service is unreachable.
//!
//! ## Pipeline Overview
//!
//! ```text
//! photo
//!  │
//!  ├─ 1. Input      resolve file, sniff MIME type from magic bytes
//!  ├─ 2. Encode     bytes → base64 inline data
//!  ├─ 3. Vision     one multimodal Gemini call, JSON-array reply
//!  ├─ 4. Parse      strip fences, validate, project into MenuItem
//!  └─ 5. Normalize  concurrent rate lookups, attach converted prices
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use menulens::{analyze_menu_file, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from GEMINI_API_KEY
//!     let config = AnalysisConfig::from_env();
//!     let items = analyze_menu_file("menu.jpg", &config).await?;
//!     for item in &items {
//!         println!("{} — {}", item.korean_name, item.name);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Interactive callers (a UI with upload, retry, and reset) use
//! [`AnalysisSession`] instead of the one-shot functions; it remembers the
//! last uploaded image and exposes the current [`SessionPhase`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `menulens` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! menulens = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod item;
pub mod pipeline;
pub mod prompts;
pub mod session;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze_image, analyze_menu, analyze_menu_file};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, DEFAULT_MODEL, DEFAULT_RATES_ENDPOINT};
pub use error::MenuLensError;
pub use item::{format_krw, MenuItem};
pub use pipeline::rates::{RateResolver, RateSource, RateSourceError};
pub use pipeline::vision::VisionModel;
pub use session::{AnalysisSession, MenuImage, SessionPhase};
