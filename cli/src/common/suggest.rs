//! Turns matched products into pitched, linked suggestions.
use crate::common::catalog::{url::product_url, Product};
use crate::common::pitch::{text::visible_text, PitchGenerator};
use futures_util::stream::{self, StreamExt};
use serde::Serialize;

/// One product as presented to a shopper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSuggestion {
    pub name: String,
    /// Visible text of the product's description.
    pub description: String,
    /// One-sentence pitch.
    pub recommendation: String,
    pub url: String,
}

/// Pitches the products with at most `pitches.max_concurrency()` completions
/// in flight; output order follows `products`.
pub async fn suggest_products(
    pitches: &PitchGenerator,
    products: &[Product],
    storefront_base_url: &str,
) -> Vec<ProductSuggestion> {
    let pending: Vec<_> = products
        .iter()
        .map(|product| pitches.pitch(product.pitch_source()))
        .collect();
    let recommendations: Vec<String> = stream::iter(pending)
        .buffered(pitches.max_concurrency())
        .collect()
        .await;

    products
        .iter()
        .zip(recommendations)
        .map(|(product, recommendation)| ProductSuggestion {
            name: product.name.clone(),
            description: visible_text(product.pitch_source()),
            recommendation,
            url: product_url(storefront_base_url, &product.url_key),
        })
        .collect()
}
