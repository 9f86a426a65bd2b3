//! # MySQL Catalog Backend
//!
//! File: cli/src/common/catalog/mysql.rs
//!
//! ## Overview
//!
//! `sqlx` implementation of `Catalog` over the shop's MySQL schema:
//!
//! - `category_translations(category_id, name)`
//! - `attribute_options(id, admin_name, attribute_id)` (23 = color, 24 = size)
//! - `product_flat`, `product_categories`, `product_attribute_values`
//!
//! One pool is created per process and shared by every request. The pool
//! connects lazily, so the server starts even while the database is down and
//! individual lookups report `CatalogError::Connectivity` until it comes back.
//!
//! Unsigned id columns are cast to `SIGNED` in SQL so that every id decodes as
//! `i64` regardless of how the schema declares it.
//!
use super::matcher::PRODUCT_MATCH_SQL;
use super::{Catalog, OptionMap, Product, ProductFilter};
use crate::core::config::{CatalogConfig, DatabaseConfig};
use crate::core::error::{CatalogError, ShopError};
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::{debug, error};

const CATEGORIES_SQL: &str = "\
SELECT CAST(category_id AS SIGNED) AS id, name
FROM category_translations
WHERE name IS NOT NULL
ORDER BY category_id";

/// The excluded id must equal `ROOT_CATEGORY_ID`.
const CATEGORIES_WITHOUT_ROOT_SQL: &str = "\
SELECT CAST(category_id AS SIGNED) AS id, name
FROM category_translations
WHERE name IS NOT NULL AND category_id <> 1
ORDER BY category_id";

/// Options of one attribute type; the placeholder takes `SIZE_ATTRIBUTE_ID` or `COLOR_ATTRIBUTE_ID`.
const ATTRIBUTE_OPTIONS_SQL: &str = "\
SELECT CAST(id AS SIGNED) AS id, admin_name
FROM attribute_options
WHERE attribute_id = ? AND admin_name IS NOT NULL
ORDER BY id";

#[derive(sqlx::FromRow)]
struct ProductRow {
    product_id: i64,
    name: Option<String>,
    short_description: Option<String>,
    description: Option<String>,
    url_key: Option<String>,
    status: i64,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.product_id,
            name: row.name.unwrap_or_default(),
            short_description: row.short_description.unwrap_or_default(),
            description: row.description.unwrap_or_default(),
            url_key: row.url_key.unwrap_or_default(),
            status: row.status,
        }
    }
}

/// Catalog backed by a MySQL connection pool.
#[derive(Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
    exclude_root_category: bool,
}

impl MySqlCatalog {
    /// Builds the pool from configuration. No connection is opened here.
    pub fn connect_lazy(
        db: &DatabaseConfig,
        catalog: &CatalogConfig,
    ) -> Result<Self, ShopError> {
        let options = connect_options(db)?;
        let pool = MySqlPoolOptions::new()
            .max_connections(db.max_connections)
            .acquire_timeout(Duration::from_secs(db.acquire_timeout_secs))
            .connect_lazy_with(options);
        debug!(
            host = db.host.as_deref().unwrap_or_default(),
            port = db.port,
            max_connections = db.max_connections,
            "MySQL catalog pool created"
        );
        Ok(Self {
            pool,
            exclude_root_category: catalog.exclude_root_category,
        })
    }

    async fn attribute_options(
        &self,
        attribute_id: i64,
        what: &str,
    ) -> Result<OptionMap, CatalogError> {
        let rows: Vec<(i64, String)> = sqlx::query_as(ATTRIBUTE_OPTIONS_SQL)
            .bind(attribute_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_failure(what, e))?;
        Ok(rows.into_iter().collect())
    }
}

fn connect_options(db: &DatabaseConfig) -> Result<MySqlConnectOptions, ShopError> {
    let required = |value: &Option<String>, label: &str| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .map(str::to_owned)
            .ok_or_else(|| ShopError::Config(format!("database {} not set", label)))
    };
    let host = required(&db.host, "host")?;
    let user = required(&db.user, "user")?;
    let name = required(&db.name, "name")?;

    let mut options = MySqlConnectOptions::new()
        .host(&host)
        .port(db.port)
        .username(&user)
        .database(&name);
    if let Some(password) = db.password.as_deref() {
        options = options.password(password);
    }
    Ok(options)
}

fn log_failure(what: &str, err: sqlx::Error) -> CatalogError {
    let err = CatalogError::from(err);
    error!("Error fetching {}: {}", what, err);
    err
}

#[async_trait]
impl Catalog for MySqlCatalog {
    async fn categories(&self) -> Result<OptionMap, CatalogError> {
        let sql = if self.exclude_root_category {
            CATEGORIES_WITHOUT_ROOT_SQL
        } else {
            CATEGORIES_SQL
        };
        let rows: Vec<(i64, String)> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_failure("categories", e))?;
        Ok(rows.into_iter().collect())
    }

    async fn sizes(&self) -> Result<OptionMap, CatalogError> {
        self.attribute_options(super::SIZE_ATTRIBUTE_ID, "sizes").await
    }

    async fn colors(&self) -> Result<OptionMap, CatalogError> {
        self.attribute_options(super::COLOR_ATTRIBUTE_ID, "colors").await
    }

    async fn matching_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, CatalogError> {
        let [first, second, third] = filter.bind_values();
        let rows: Vec<ProductRow> = sqlx::query_as(PRODUCT_MATCH_SQL)
            .bind(first)
            .bind(second)
            .bind(third)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| log_failure("products", e))?;
        Ok(rows.into_iter().map(Product::from).collect())
    }
}
