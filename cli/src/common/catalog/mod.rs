//! # Product Catalog (`common::catalog`)
//!
//! File: cli/src/common/catalog/mod.rs
//!
//! ## Overview
//!
//! Read-only access to the shop's product catalog. The `Catalog` trait is the
//! seam between the shopping flows (CLI session, HTTP dispatcher) and the
//! database; `mysql::MySqlCatalog` is the production implementation.
//!
//! ## Architecture
//!
//! - `mod.rs`: domain types (`Product`, `OptionMap`) and the `Catalog` trait
//! - `matcher`: the product filter (`ProductFilter`, `find_products`) and the
//!   canonical match query
//! - `mysql`: `sqlx` MySQL implementation of `Catalog`
//! - `url`: storefront link assembly
//!
//! Every lookup returns `Result<_, CatalogError>`. An empty table is
//! `Ok(empty)`, a failing database is `Err`, and the two are never conflated.
//!
use crate::core::error::CatalogError;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub mod matcher;
pub mod mysql;
pub mod url;

#[cfg(test)]
pub mod memory;

pub use matcher::{find_products, ProductFilter};

/// Attribute-type id of the "color" attribute in `attribute_options` / `product_attribute_values`.
pub const COLOR_ATTRIBUTE_ID: i64 = 23;
/// Attribute-type id of the "size" attribute.
pub const SIZE_ATTRIBUTE_ID: i64 = 24;
/// The root category, hidden from listings when `catalog.exclude_root_category` is set.
pub const ROOT_CATEGORY_ID: i64 = 1;
/// `product_flat.status` value for products that may be sold.
pub const ACTIVE_STATUS: i64 = 1;

/// Id → label mapping returned by the category, size and color lookups.
pub type OptionMap = BTreeMap<i64, String>;

/// A product row from the flat product table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Short description, may contain HTML.
    pub short_description: String,
    /// Long description, may contain HTML.
    pub description: String,
    pub url_key: String,
    pub status: i64,
}

impl Product {
    /// The text a pitch is written from: the short description, or the long
    /// one when the short description is blank.
    pub fn pitch_source(&self) -> &str {
        if self.short_description.trim().is_empty() {
            &self.description
        } else {
            &self.short_description
        }
    }
}

/// Read-only catalog queries.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn categories(&self) -> Result<OptionMap, CatalogError>;

    async fn sizes(&self) -> Result<OptionMap, CatalogError>;

    async fn colors(&self) -> Result<OptionMap, CatalogError>;

    /// Active products in the filter's category carrying both its size and color.
    async fn matching_products(&self, filter: &ProductFilter)
        -> Result<Vec<Product>, CatalogError>;
}

/// Case-insensitive lookup of `label` among `options`, ignoring surrounding whitespace.
pub fn resolve_option(options: &OptionMap, label: &str) -> Option<i64> {
    let wanted = label.trim().to_lowercase();
    if wanted.is_empty() {
        return None;
    }
    options
        .iter()
        .find(|(_, name)| name.trim().to_lowercase() == wanted)
        .map(|(id, _)| *id)
}
