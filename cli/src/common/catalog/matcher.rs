//! # Product Matcher
//!
//! File: cli/src/common/catalog/matcher.rs
//!
//! ## Overview
//!
//! Selects the active products of one category that are offered in one size and
//! one color. The attribute-value table is joined once per attribute, so a
//! product only survives when it has a row for the requested size *and* a row
//! for the requested color. `DISTINCT` collapses the duplicates produced by
//! products carrying several membership or attribute rows.
//!
//! The statement uses positional `?` placeholders; `ProductFilter::bind_values`
//! returns the ids in exactly the placeholder order and is the only way the
//! MySQL backend binds them.
//!
use super::{Catalog, Product};
use crate::core::error::CatalogError;
use tracing::{debug, info};

/// Canonical product match query. Placeholders, in order: size id, color id, category id.
///
/// The literal attribute ids and status must equal `SIZE_ATTRIBUTE_ID`,
/// `COLOR_ATTRIBUTE_ID` and `ACTIVE_STATUS`; a unit test pins them.
pub const PRODUCT_MATCH_SQL: &str = "\
SELECT DISTINCT
    CAST(pf.product_id AS SIGNED) AS product_id,
    pf.name,
    pf.short_description,
    pf.description,
    pf.url_key,
    CAST(pf.status AS SIGNED) AS status
FROM product_flat pf
JOIN product_categories pc
    ON pf.product_id = pc.product_id
JOIN product_attribute_values size_attr
    ON pf.product_id = size_attr.product_id
    AND size_attr.attribute_id = 24
    AND size_attr.integer_value = ?
JOIN product_attribute_values color_attr
    ON pf.product_id = color_attr.product_id
    AND color_attr.attribute_id = 23
    AND color_attr.integer_value = ?
WHERE pc.category_id = ?
    AND pf.status = 1
ORDER BY product_id";

/// A validated (category, size, color) selection. All ids are positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductFilter {
    pub category_id: i64,
    pub size_id: i64,
    pub color_id: i64,
}

impl ProductFilter {
    /// Returns `None` when any id is zero or negative.
    pub fn new(category_id: i64, size_id: i64, color_id: i64) -> Option<Self> {
        if category_id <= 0 || size_id <= 0 || color_id <= 0 {
            return None;
        }
        Some(Self {
            category_id,
            size_id,
            color_id,
        })
    }

    /// Ids in the order of the placeholders in `PRODUCT_MATCH_SQL`.
    pub fn bind_values(&self) -> [i64; 3] {
        [self.size_id, self.color_id, self.category_id]
    }
}

/// Finds the active products matching the given ids.
///
/// A zero or negative id short-circuits to an empty list without touching the
/// catalog. Database failures are returned as `Err`, never as an empty list.
pub async fn find_products(
    catalog: &dyn Catalog,
    category_id: i64,
    size_id: i64,
    color_id: i64,
) -> Result<Vec<Product>, CatalogError> {
    let Some(filter) = ProductFilter::new(category_id, size_id, color_id) else {
        debug!(
            category_id,
            size_id, color_id, "Incomplete product filter, skipping query"
        );
        return Ok(Vec::new());
    };

    let products = catalog.matching_products(&filter).await?;
    info!(
        category_id,
        size_id,
        color_id,
        matches = products.len(),
        "Product search finished"
    );
    Ok(products)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::catalog::memory::MemoryCatalog;
    use crate::common::catalog::{ACTIVE_STATUS, COLOR_ATTRIBUTE_ID, SIZE_ATTRIBUTE_ID};

    #[test]
    fn test_filter_rejects_missing_ids() {
        assert!(ProductFilter::new(0, 2, 3).is_none());
        assert!(ProductFilter::new(1, 0, 3).is_none());
        assert!(ProductFilter::new(1, 2, 0).is_none());
        assert!(ProductFilter::new(-4, 2, 3).is_none());
        assert!(ProductFilter::new(1, 2, 3).is_some());
    }

    #[test]
    fn test_bind_order_follows_placeholder_order() {
        let filter = ProductFilter::new(5, 6, 7).unwrap();
        assert_eq!(filter.bind_values(), [6, 7, 5]);

        assert_eq!(PRODUCT_MATCH_SQL.matches('?').count(), filter.bind_values().len());

        let size_at = PRODUCT_MATCH_SQL.find("size_attr.integer_value = ?").unwrap();
        let color_at = PRODUCT_MATCH_SQL.find("color_attr.integer_value = ?").unwrap();
        let category_at = PRODUCT_MATCH_SQL.find("pc.category_id = ?").unwrap();
        assert!(size_at < color_at && color_at < category_at);
    }

    #[test]
    fn test_query_restricts_to_active_distinct_products() {
        assert!(PRODUCT_MATCH_SQL.contains("SELECT DISTINCT"));
        assert!(PRODUCT_MATCH_SQL.contains(&format!("pf.status = {}", ACTIVE_STATUS)));
    }

    #[test]
    fn test_query_literals_match_catalog_constants() {
        assert!(PRODUCT_MATCH_SQL.contains(&format!(
            "size_attr.attribute_id = {}",
            SIZE_ATTRIBUTE_ID
        )));
        assert!(PRODUCT_MATCH_SQL.contains(&format!(
            "color_attr.attribute_id = {}",
            COLOR_ATTRIBUTE_ID
        )));
        // Exactly one status filter and two attribute filters.
        assert_eq!(PRODUCT_MATCH_SQL.matches("pf.status =").count(), 1);
        assert_eq!(PRODUCT_MATCH_SQL.matches("attribute_id =").count(), 2);
    }

    #[tokio::test]
    async fn test_zero_id_issues_no_query() {
        let catalog = MemoryCatalog::sample();

        let products = find_products(&catalog, 0, 6, 3).await.unwrap();
        assert!(products.is_empty());
        let products = find_products(&catalog, 2, 6, 0).await.unwrap();
        assert!(products.is_empty());

        assert_eq!(catalog.match_queries(), 0);
    }

    #[tokio::test]
    async fn test_inactive_products_never_returned() {
        let catalog = MemoryCatalog::sample();

        // Category 2 / size M (6) / color Red (3) contains one active and one disabled product.
        let products = find_products(&catalog, 2, 6, 3).await.unwrap();
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![10]);
        assert!(products.iter().all(|p| p.status == 1));
        assert_eq!(catalog.match_queries(), 1);
    }

    #[tokio::test]
    async fn test_product_needs_both_size_and_color() {
        let catalog = MemoryCatalog::sample();

        // Product 12 is red but only offered in size L (7); 13 comes in L but is blue.
        let products = find_products(&catalog, 2, 7, 3).await.unwrap();
        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![12]);
        let products = find_products(&catalog, 2, 7, 4).await.unwrap();
        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![13]);
        let products = find_products(&catalog, 3, 7, 4).await.unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_not_an_empty_result() {
        let catalog = MemoryCatalog::sample().failing();

        let result = find_products(&catalog, 2, 6, 3).await;
        assert!(matches!(result, Err(CatalogError::Connectivity(_))));
    }
}
