//! Pipeline stages for menu-photo analysis.
//!
//! Each submodule implements exactly one transformation step. Keeping the
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different rate service) without touching other
//! stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ encode ──▶ vision ──▶ parse ──▶ normalize
//! (path)   (base64)    (VLM)     (JSON)     (rates)
//! ```
//!
//! 1. [`input`]     — resolve a user-supplied path to image bytes + MIME type
//! 2. [`encode`]    — base64-wrap the bytes for the multimodal request body
//! 3. [`vision`]    — the one stage with model network I/O; single request,
//!    no internal retries (retry is a caller-triggered action)
//! 4. [`parse`]     — strip stray markdown fences, validate the JSON array,
//!    project field-by-field into [`crate::item::MenuItem`]
//! 5. [`rates`] / [`normalize`] — attach converted target-currency prices,
//!    tolerating per-item lookup failures

pub mod encode;
pub mod input;
pub mod normalize;
pub mod parse;
pub mod rates;
pub mod vision;
