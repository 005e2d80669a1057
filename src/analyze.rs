//! One-shot analysis entry points.
//!
//! These run the full pipeline eagerly — input, vision extraction, price
//! normalization — and return the finished item list. Callers that need
//! retry or upload state use [`crate::session::AnalysisSession`], which
//! wraps the same [`analyze_image`] call.

use crate::config::AnalysisConfig;
use crate::error::MenuLensError;
use crate::item::MenuItem;
use crate::pipeline::{input, normalize, vision};
use crate::pipeline::rates::RateResolver;
use crate::session::MenuImage;
use std::path::Path;
use tracing::info;

/// Analyze an already-loaded image.
pub async fn analyze_image(
    image: &MenuImage,
    config: &AnalysisConfig,
) -> Result<Vec<MenuItem>, MenuLensError> {
    let items = vision::extract_items(image, config).await?;
    let resolver = RateResolver::from_config(config)?;
    let items = normalize::normalize_prices(items, &resolver, config.concurrency).await;
    info!("Analyzed menu: {} items", items.len());
    Ok(items)
}

/// Analyze raw image bytes with a caller-supplied MIME type.
pub async fn analyze_menu(
    bytes: &[u8],
    mime_type: &str,
    config: &AnalysisConfig,
) -> Result<Vec<MenuItem>, MenuLensError> {
    let image = MenuImage {
        bytes: bytes.to_vec(),
        mime_type: mime_type.to_string(),
    };
    analyze_image(&image, config).await
}

/// Analyze an image file, sniffing its MIME type from magic bytes.
pub async fn analyze_menu_file(
    path: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<Vec<MenuItem>, MenuLensError> {
    let image = input::resolve_image(path)?;
    analyze_image(&image, config).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::encode::InlineImage;
    use crate::pipeline::rates::{RateSource, RateSourceError};
    use crate::pipeline::vision::VisionModel;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct CannedVision(String);

    #[async_trait]
    impl VisionModel for CannedVision {
        async fn generate(
            &self,
            _prompt: &str,
            _image: &InlineImage,
        ) -> Result<String, MenuLensError> {
            Ok(self.0.clone())
        }
    }

    struct DownRates;

    #[async_trait]
    impl RateSource for DownRates {
        async fn latest(&self, _base: &str) -> Result<HashMap<String, f64>, RateSourceError> {
            Err(RateSourceError::Request("unreachable".into()))
        }
    }

    fn config_with(reply: &str) -> AnalysisConfig {
        AnalysisConfig::builder()
            .api_key("test-key")
            .vision(Arc::new(CannedVision(reply.to_string())))
            .rates(Arc::new(DownRates))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn analyze_menu_extracts_and_normalizes() {
        let reply = r#"[{"name":"Burger","koreanName":"버거","price":15.5,"currency":"USD"}]"#;
        let config = config_with(reply);

        let items = analyze_menu(&[0xFF, 0xD8, 0xFF, 0xE0], "image/jpeg", &config)
            .await
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].converted_price, Some(20150));
    }

    #[tokio::test]
    async fn analyze_menu_file_rejects_missing_paths() {
        let config = config_with("[]");
        let result = analyze_menu_file("/no/such/menu.jpg", &config).await;
        assert!(matches!(result, Err(MenuLensError::ImageNotFound { .. })));
    }
}
