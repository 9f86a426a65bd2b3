//! In-memory `Catalog` used by unit tests across the crate.
//!
//! Rows are kept in the same shape as the relational tables (products,
//! category memberships, attribute values) and `matching_products` applies
//! the same rules as `PRODUCT_MATCH_SQL`.
use super::{
    Catalog, OptionMap, Product, ProductFilter, ACTIVE_STATUS, COLOR_ATTRIBUTE_ID,
    SIZE_ATTRIBUTE_ID,
};
use crate::core::error::CatalogError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct MemoryCatalog {
    categories: OptionMap,
    sizes: OptionMap,
    colors: OptionMap,
    products: Vec<Product>,
    memberships: Vec<(i64, i64)>,
    attribute_values: Vec<(i64, i64, i64)>,
    failing: bool,
    match_queries: AtomicUsize,
}

impl MemoryCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shoes (2) and Shirts (3); sizes M (6) and L (7); colors Red (3) and Blue (4).
    ///
    /// - 10 "Trail Runner": active, shoes, M, red
    /// - 11 "Old Runner": disabled, shoes, M, red
    /// - 12 "Red Sprinter": active, shoes (listed twice), L, red
    /// - 13 "Blue Walker": active, shoes, M and L, blue
    pub fn sample() -> Self {
        let mut catalog = Self {
            categories: OptionMap::from([(2, "Shoes".into()), (3, "Shirts".into())]),
            sizes: OptionMap::from([(6, "M".into()), (7, "L".into())]),
            colors: OptionMap::from([(3, "Red".into()), (4, "Blue".into())]),
            ..Self::default()
        };
        catalog.add_product(
            product(10, "Trail Runner", "<p>Great shoes for running.</p> Buy now!", ACTIVE_STATUS),
            2,
            &[6],
            &[3],
        );
        catalog.add_product(product(11, "Old Runner", "Discontinued.", 0), 2, &[6], &[3]);
        catalog.add_product(product(12, "Red Sprinter", "Fast and red.", ACTIVE_STATUS), 2, &[7], &[3]);
        catalog.memberships.push((12, 2));
        catalog.add_product(
            product(13, "Blue Walker", "Comfortable all day.", ACTIVE_STATUS),
            2,
            &[6, 7],
            &[4],
        );
        catalog
    }

    /// Makes every query fail with a connectivity error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn add_product(&mut self, product: Product, category_id: i64, sizes: &[i64], colors: &[i64]) {
        let id = product.id;
        self.products.push(product);
        self.memberships.push((id, category_id));
        for size in sizes {
            self.attribute_values.push((id, SIZE_ATTRIBUTE_ID, *size));
        }
        for color in colors {
            self.attribute_values.push((id, COLOR_ATTRIBUTE_ID, *color));
        }
    }

    /// Number of `matching_products` calls that reached this catalog.
    pub fn match_queries(&self) -> usize {
        self.match_queries.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), CatalogError> {
        if self.failing {
            Err(CatalogError::Connectivity("connection refused".into()))
        } else {
            Ok(())
        }
    }

    fn has_value(&self, product_id: i64, attribute_id: i64, value: i64) -> bool {
        self.attribute_values
            .iter()
            .any(|row| *row == (product_id, attribute_id, value))
    }
}

pub fn product(id: i64, name: &str, short_description: &str, status: i64) -> Product {
    Product {
        id,
        name: name.to_string(),
        short_description: short_description.to_string(),
        description: String::new(),
        url_key: name.to_lowercase().replace(' ', "-"),
        status,
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn categories(&self) -> Result<OptionMap, CatalogError> {
        self.check()?;
        Ok(self.categories.clone())
    }

    async fn sizes(&self) -> Result<OptionMap, CatalogError> {
        self.check()?;
        Ok(self.sizes.clone())
    }

    async fn colors(&self) -> Result<OptionMap, CatalogError> {
        self.check()?;
        Ok(self.colors.clone())
    }

    async fn matching_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, CatalogError> {
        self.match_queries.fetch_add(1, Ordering::SeqCst);
        self.check()?;

        let mut found: Vec<Product> = self
            .products
            .iter()
            .filter(|p| p.status == ACTIVE_STATUS)
            .filter(|p| self.memberships.contains(&(p.id, filter.category_id)))
            .filter(|p| self.has_value(p.id, SIZE_ATTRIBUTE_ID, filter.size_id))
            .filter(|p| self.has_value(p.id, COLOR_ATTRIBUTE_ID, filter.color_id))
            .cloned()
            .collect();
        found.sort_by_key(|p| p.id);
        found.dedup_by_key(|p| p.id);
        Ok(found)
    }
}
