//! Exchange-rate resolution with a static fallback.
//!
//! The resolver is the one component that must never fail its caller:
//! every expected failure mode (network down, bad JSON, unknown currency)
//! is absorbed here and signalled only as a fallback value or `None`.
//! The static table is the de facto timeout mitigation for currency
//! lookups — an unreachable rate service degrades to approximate
//! conversions instead of a failed analysis.
//!
//! The live service sits behind [`RateSource`] so tests can force the
//! fallback path or serve a canned rate table.

use crate::config::AnalysisConfig;
use crate::error::MenuLensError;
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Approximate KRW rates used when the live lookup fails.
const FALLBACK_RATES: &[(&str, f64)] = &[
    ("USD", 1300.0),
    ("EUR", 1400.0),
    ("JPY", 9.0),
    ("CNY", 180.0),
    ("KRW", 1.0),
];

/// Failure of one live rate fetch. Internal to the resolver boundary:
/// callers of [`RateResolver::rate`] only ever see `Option<f64>`.
#[derive(Debug, Error)]
pub enum RateSourceError {
    #[error("rate request failed: {0}")]
    Request(String),
    #[error("rate response invalid: {0}")]
    Decode(String),
}

/// A service answering "latest rates for base currency X" with a mapping
/// from currency code to multiplier.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn latest(&self, base: &str) -> Result<HashMap<String, f64>, RateSourceError>;
}

/// Resolves source → target conversion multipliers.
pub struct RateResolver {
    source: Arc<dyn RateSource>,
    target: String,
}

impl RateResolver {
    pub fn new(source: Arc<dyn RateSource>, target: impl Into<String>) -> Self {
        Self {
            source,
            target: target.into(),
        }
    }

    /// Build from config: injected source if present, live lookup otherwise.
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, MenuLensError> {
        let source: Arc<dyn RateSource> = match config.rates {
            Some(ref rates) => Arc::clone(rates),
            None => Arc::new(LiveRates::new(
                &config.rates_endpoint,
                config.api_timeout_secs,
            )?),
        };
        Ok(Self::new(source, config.target_currency.clone()))
    }

    /// Multiplier from `source_currency` to the target currency.
    ///
    /// `Some(1.0)` when both denote the same currency; the live rate when
    /// the lookup succeeds; the static fallback when the lookup itself
    /// fails (network or decode); `None` when the currency is unknown even
    /// to the fallback table, or when a successful response carries no
    /// usable entry for the target. Never returns an error.
    pub async fn rate(&self, source_currency: &str) -> Option<f64> {
        let code = source_currency.trim().to_ascii_uppercase();
        if code == self.target {
            return Some(1.0);
        }

        match self.source.latest(&code).await {
            // A completed lookup is authoritative: a response without a
            // usable target entry leaves the currency unresolved rather
            // than reaching for the fallback table.
            Ok(rates) => match rates.get(&self.target).copied().filter(|r| *r > 0.0) {
                Some(rate) => {
                    debug!("Live rate {code}→{}: {rate}", self.target);
                    Some(rate)
                }
                None => {
                    warn!("Rate response for {code} has no usable {} entry", self.target);
                    None
                }
            },
            Err(e) => {
                warn!("Rate lookup for {code} failed ({e}), using fallback");
                self.fallback(&code)
            }
        }
    }

    fn fallback(&self, code: &str) -> Option<f64> {
        FALLBACK_RATES
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, rate)| *rate)
    }
}

// ── Live HTTP source ─────────────────────────────────────────────────────

/// Live lookup against a "latest rates for base X" HTTP service.
pub struct LiveRates {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct RatesResponse {
    rates: HashMap<String, f64>,
}

impl LiveRates {
    pub fn new(endpoint: &str, timeout_secs: u64) -> Result<Self, MenuLensError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| MenuLensError::Internal(format!("HTTP client: {e}")))?;
        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RateSource for LiveRates {
    async fn latest(&self, base: &str) -> Result<HashMap<String, f64>, RateSourceError> {
        let url = format!("{}/{}", self.endpoint, base);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| RateSourceError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateSourceError::Request(format!("HTTP {status}")));
        }

        let body: RatesResponse = response
            .json()
            .await
            .map_err(|e| RateSourceError::Decode(e.to_string()))?;

        Ok(body.rates)
    }
}
