//! Stateful analysis session: upload, retry, reset.
//!
//! [`AnalysisSession`] wraps the one-shot pipeline with the state an
//! interactive front end needs: the last uploaded image (for retry), the
//! current result or user-facing error message, a loading flag that makes
//! concurrent submissions no-ops, and an upload epoch that lets a UI know
//! when its file-input widget must be rebuilt.
//!
//! The phase is derived, never stored: `Loading` while an analysis runs,
//! `Error` when the last attempt left a message, `Success` once a result
//! exists (an empty menu is still a success), `Idle` otherwise. Exactly one
//! of result and error is populated after any completed attempt.

use crate::analyze;
use crate::config::AnalysisConfig;
use crate::item::MenuItem;
use tracing::{debug, info, warn};

/// Raw image bytes plus the MIME type the vision API is told about.
#[derive(Debug, Clone)]
pub struct MenuImage {
    pub bytes: Vec<u8>,
    /// e.g. `image/jpeg`. Sniffed from magic bytes when the image comes
    /// from a file path, supplied by the caller otherwise.
    pub mime_type: String,
}

/// Where the session currently stands. Derived from the session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No analysis attempted since creation or the last reset.
    Idle,
    /// An analysis is in flight; new submissions are ignored.
    Loading,
    /// The last analysis produced a menu (possibly empty).
    Success,
    /// The last analysis failed; [`AnalysisSession::error`] has the message.
    Error,
}

/// Orchestrates menu analyses and holds their outcome.
pub struct AnalysisSession {
    config: AnalysisConfig,
    last_input: Option<MenuImage>,
    result: Option<Vec<MenuItem>>,
    error: Option<String>,
    loading: bool,
    upload_epoch: u64,
}

impl AnalysisSession {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            config,
            last_input: None,
            result: None,
            error: None,
            loading: false,
            upload_epoch: 0,
        }
    }

    /// Submit an image for analysis.
    ///
    /// `None` means the file picker was cleared: the result, error, and
    /// remembered input are all dropped, so a following [`retry`] is a
    /// no-op until something new is uploaded.
    /// A submission while another analysis is loading is ignored.
    ///
    /// [`retry`]: AnalysisSession::retry
    pub async fn submit(&mut self, input: Option<MenuImage>) {
        if self.loading {
            debug!("Submission ignored: an analysis is already in flight");
            return;
        }

        self.last_input = input.clone();
        let Some(image) = input else {
            self.result = None;
            self.error = None;
            return;
        };

        self.run(image).await;
    }

    /// Re-run the last submitted image. No-op without one.
    pub async fn retry(&mut self) {
        if self.loading {
            debug!("Retry ignored: an analysis is already in flight");
            return;
        }
        match self.last_input.clone() {
            Some(image) => self.run(image).await,
            None => debug!("Retry ignored: nothing was submitted yet"),
        }
    }

    /// Drop all state and advance the upload epoch.
    ///
    /// The epoch is the signal a UI uses to recreate its file-input widget;
    /// without it, re-selecting the same file after a reset would not fire
    /// a change event.
    pub fn reset(&mut self) {
        self.last_input = None;
        self.result = None;
        self.error = None;
        self.loading = false;
        self.upload_epoch += 1;
        info!("Session reset (epoch {})", self.upload_epoch);
    }

    async fn run(&mut self, image: MenuImage) {
        // A missing credential never enters the loading phase; the session
        // goes straight to its error state without a network round trip.
        if let Err(e) = self.config.credential() {
            warn!("Analysis refused: {e}");
            self.result = None;
            self.error = Some(e.user_message().to_string());
            return;
        }

        self.loading = true;
        self.result = None;
        self.error = None;

        match analyze::analyze_image(&image, &self.config).await {
            Ok(items) => {
                info!("Analysis succeeded with {} items", items.len());
                self.result = Some(items);
            }
            Err(e) => {
                warn!("Analysis failed: {e}");
                self.error = Some(e.user_message().to_string());
            }
        }

        self.loading = false;
    }

    // ── Accessors ────────────────────────────────────────────────────────

    pub fn phase(&self) -> SessionPhase {
        if self.loading {
            SessionPhase::Loading
        } else if self.error.is_some() {
            SessionPhase::Error
        } else if self.result.is_some() {
            SessionPhase::Success
        } else {
            SessionPhase::Idle
        }
    }

    /// The last successful result, if any.
    pub fn items(&self) -> Option<&[MenuItem]> {
        self.result.as_deref()
    }

    /// User-facing message of the last failed attempt, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn upload_epoch(&self) -> u64 {
        self.upload_epoch
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }
}
