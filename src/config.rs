//! Configuration for menu analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share a config between the session and the one-shot entry
//! points, and to inject test doubles for the two external services.
//!
//! The credential is an explicit field, never an ambient lookup inside the
//! pipeline: [`AnalysisConfig::from_env`] is the single place that reads
//! `GEMINI_API_KEY`, and callers that want another source just set
//! `api_key` themselves.

use crate::error::MenuLensError;
use crate::pipeline::rates::RateSource;
use crate::pipeline::vision::VisionModel;
use std::fmt;
use std::sync::Arc;

/// Placeholder value a freshly copied config template still carries.
/// Treated the same as a missing key.
pub const PLACEHOLDER_API_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Default vision model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default exchange-rate endpoint; `/{BASE}` is appended per lookup.
pub const DEFAULT_RATES_ENDPOINT: &str = "https://api.exchangerate-api.com/v4/latest";

/// Configuration for a menu analysis.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::from_env()`].
///
/// # Example
/// ```rust
/// use menulens::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .api_key("my-key")
///     .target_currency("KRW")
///     .concurrency(4)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Credential for the vision service. `None` or the placeholder value
    /// fails with [`MenuLensError::Configuration`] before any network call.
    pub api_key: Option<String>,

    /// Vision model identifier. Default: `gemini-2.5-flash`.
    pub model: String,

    /// Currency prices are converted into. Default: `KRW`.
    pub target_currency: String,

    /// Base URL of the exchange-rate service.
    pub rates_endpoint: String,

    /// Per-HTTP-call timeout in seconds. Default: 60.
    ///
    /// Applies to both the vision call and each rate lookup. The rate
    /// resolver additionally has its static fallback table, so a slow rate
    /// service degrades to approximate conversions rather than a hang.
    pub api_timeout_secs: u64,

    /// Cap on concurrent rate lookups within one normalization batch.
    /// Default: 4.
    ///
    /// Lookups are network-bound and deduplicated per distinct currency,
    /// so a typical menu needs one or two; the cap only matters for menus
    /// mixing many currencies.
    pub concurrency: usize,

    /// Custom instruction prompt. If `None`, uses the built-in default.
    pub prompt: Option<String>,

    /// Pre-constructed vision service. Takes precedence over the built-in
    /// Gemini client. Useful in tests or when the caller needs custom
    /// middleware.
    pub vision: Option<Arc<dyn VisionModel>>,

    /// Pre-constructed rate source. Takes precedence over the built-in
    /// live lookup.
    pub rates: Option<Arc<dyn RateSource>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            target_currency: "KRW".to_string(),
            rates_endpoint: DEFAULT_RATES_ENDPOINT.to_string(),
            api_timeout_secs: 60,
            concurrency: 4,
            prompt: None,
            vision: None,
            rates: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("target_currency", &self.target_currency)
            .field("rates_endpoint", &self.rates_endpoint)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("concurrency", &self.concurrency)
            .field("vision", &self.vision.as_ref().map(|_| "<dyn VisionModel>"))
            .field("rates", &self.rates.as_ref().map(|_| "<dyn RateSource>"))
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }

    /// Default config with the credential read from `GEMINI_API_KEY`.
    ///
    /// The environment is read here and nowhere else; an unset variable
    /// leaves `api_key` as `None` and surfaces later as a configuration
    /// error with a user-facing message, not a panic.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.api_key = std::env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty());
        config
    }

    /// The credential, validated present and non-placeholder.
    pub fn credential(&self) -> Result<&str, MenuLensError> {
        match self.api_key.as_deref() {
            None => Err(MenuLensError::Configuration {
                detail: "no API key provided".into(),
            }),
            Some(key) if key.trim().is_empty() || key == PLACEHOLDER_API_KEY => {
                Err(MenuLensError::Configuration {
                    detail: "API key is empty or still the placeholder value".into(),
                })
            }
            Some(key) => Ok(key),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn target_currency(mut self, code: impl Into<String>) -> Self {
        self.config.target_currency = code.into();
        self
    }

    pub fn rates_endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.rates_endpoint = url.into();
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs.max(1);
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.prompt = Some(prompt.into());
        self
    }

    pub fn vision(mut self, vision: Arc<dyn VisionModel>) -> Self {
        self.config.vision = Some(vision);
        self
    }

    pub fn rates(mut self, rates: Arc<dyn RateSource>) -> Self {
        self.config.rates = Some(rates);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, MenuLensError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(MenuLensError::InvalidConfig(
                "concurrency must be >= 1".into(),
            ));
        }
        if c.target_currency.len() != 3 || !c.target_currency.chars().all(|ch| ch.is_ascii_uppercase())
        {
            return Err(MenuLensError::InvalidConfig(format!(
                "target currency must be a 3-letter uppercase code, got '{}'",
                c.target_currency
            )));
        }
        if c.model.is_empty() {
            return Err(MenuLensError::InvalidConfig("model must not be empty".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_defaults() {
        let config = AnalysisConfig::builder().api_key("k").build().unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.target_currency, "KRW");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.api_timeout_secs, 60);
    }

    #[test]
    fn builder_rejects_lowercase_target_currency() {
        let result = AnalysisConfig::builder()
            .api_key("k")
            .target_currency("krw")
            .build();
        assert!(matches!(result, Err(MenuLensError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_long_target_currency() {
        let result = AnalysisConfig::builder()
            .api_key("k")
            .target_currency("WON!")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn credential_rejects_missing_key() {
        let config = AnalysisConfig::default();
        assert!(matches!(
            config.credential(),
            Err(MenuLensError::Configuration { .. })
        ));
    }

    #[test]
    fn credential_rejects_placeholder_key() {
        let config = AnalysisConfig::builder()
            .api_key(PLACEHOLDER_API_KEY)
            .build()
            .unwrap();
        assert!(matches!(
            config.credential(),
            Err(MenuLensError::Configuration { .. })
        ));
    }

    #[test]
    fn credential_accepts_real_key() {
        let config = AnalysisConfig::builder().api_key("real-key").build().unwrap();
        assert_eq!(config.credential().unwrap(), "real-key");
    }

    #[test]
    fn concurrency_builder_clamps_to_one() {
        let config = AnalysisConfig::builder()
            .api_key("k")
            .concurrency(0)
            .build()
            .unwrap();
        assert_eq!(config.concurrency, 1);
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = AnalysisConfig::builder().api_key("secret").build().unwrap();
        let dump = format!("{:?}", config);
        assert!(!dump.contains("secret"));
        assert!(dump.contains("<redacted>"));
    }
}
