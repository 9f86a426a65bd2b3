//! # ShopAssist Common Building Blocks (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Shared components used by more than one command. Command handlers
//! (`commands::`) wire them together; core infrastructure (`core::`) stays
//! separate.
//!
//! - **`catalog`**: the `Catalog` trait, its MySQL implementation, the product
//!   matcher and storefront URL assembly.
//! - **`llm`**: the `CompletionProvider` trait and the OpenAI-compatible client.
//! - **`pitch`**: visible-text extraction and one-sentence pitch generation.
//! - **`faq`**: the FAQ responder behind the chat endpoint's first choice.
//! - **`suggest`**: pitched, linked product suggestions for a result set.
//! - **`services`**: builds the shared catalog / provider handles from config.
//!
//! ```rust
//! use crate::common::{catalog, pitch};
//!
//! # async fn run_example(services: &crate::common::services::Services) -> crate::core::error::Result<()> {
//! let products = catalog::find_products(services.catalog.as_ref(), 2, 6, 3).await?;
//! for product in &products {
//!     println!("{}: {}", product.name, services.pitches.pitch(product.pitch_source()).await);
//! }
//! # Ok(())
//! # }
//! ```
//!

/// Catalog access: lookups, product matching, storefront links.
pub mod catalog;
/// FAQ responder used by the chat endpoint.
pub mod faq;
/// Completion provider seam and HTTP client.
pub mod llm;
/// One-sentence product pitches.
pub mod pitch;
/// Construction of the shared service handles.
pub mod services;
/// Pitched, linked product suggestions.
pub mod suggest;
