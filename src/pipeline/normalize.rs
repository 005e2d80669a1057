//! Price normalization: attach converted target-currency prices.
//!
//! The stage maps every convertible item through the rate resolver and
//! attaches `converted_price = round(price * rate)`. Two properties are
//! contractual:
//!
//! * the returned sequence has the same length and order as the input,
//!   regardless of lookup completion order;
//! * a failed or unresolvable lookup leaves that item unchanged and never
//!   aborts the batch or touches sibling items.
//!
//! Lookups fan out concurrently and are deduplicated per distinct currency
//! within the batch — a ten-item single-currency menu costs one request.
//! Deduplication keeps the per-item independence property: an unresolvable
//! currency simply yields no rate for the items that carry it.

use crate::item::MenuItem;
use crate::pipeline::rates::RateResolver;
use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Enrich items with converted prices. Same length and order as the input.
pub async fn normalize_prices(
    items: Vec<MenuItem>,
    resolver: &RateResolver,
    concurrency: usize,
) -> Vec<MenuItem> {
    // Fan out one lookup per distinct currency, fan in before mapping.
    let currencies: Vec<String> = items
        .iter()
        .filter(|item| item.is_convertible())
        .filter_map(|item| item.currency.as_deref())
        .map(normalize_code)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();

    if currencies.is_empty() {
        return items;
    }

    let rates: HashMap<String, Option<f64>> = stream::iter(currencies.into_iter().map(|code| {
        async move {
            let rate = resolver.rate(&code).await;
            (code, rate)
        }
    }))
    .buffer_unordered(concurrency.max(1))
    .collect()
    .await;

    debug!("Resolved rates for {} distinct currencies", rates.len());

    items
        .into_iter()
        .map(|mut item| {
            if let (Some(price), Some(currency)) = (item.price, item.currency.as_deref()) {
                if let Some(Some(rate)) = rates.get(&normalize_code(currency)) {
                    let converted = (price * rate).round();
                    if converted >= 0.0 {
                        item.converted_price = Some(converted as u64);
                    }
                }
            }
            item
        })
        .collect()
}

fn normalize_code(code: &str) -> String {
    code.trim().to_ascii_uppercase()
}
