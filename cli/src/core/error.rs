//! # ShopAssist Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout ShopAssist. Each seam
//! of the application gets its own `thiserror` enum so that callers can tell
//! *what* failed, and the application edge (`main.rs`, command handlers) works
//! with `anyhow` for context and propagation.
//!
//! ## Architecture
//!
//! - `ShopError`: application-level failures (configuration, validation) and a
//!   transparent wrapper around the component errors below.
//! - `CatalogError`: database failures, split into connectivity problems and
//!   query problems. A successful lookup with no rows is `Ok(empty)`, never an
//!   error, so "nothing matched" and "lookup failed" stay distinguishable.
//! - `LlmError`: completion provider failures. These never escape the pitch
//!   generator or the FAQ responder; they are logged and replaced by a fixed
//!   fallback text.
//! - `Result<T>`: alias for `anyhow::Result<T>` used by command handlers.
//!
//! ## Examples
//!
//! ```rust
//! // Fatal configuration problem at startup
//! return Err(ShopError::Config("database user is not set".into()).into());
//!
//! // Telling an empty result apart from a failed one
//! match catalog.colors().await {
//!     Ok(colors) if colors.is_empty() => println!("No colors defined."),
//!     Ok(colors) => render(&colors),
//!     Err(e) => eprintln!("Color lookup failed: {}", e),
//! }
//! ```
//!
use thiserror::Error;

/// Application-level error type.
#[derive(Error, Debug)]
pub enum ShopError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Failures reported by a catalog backend.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The database could not be reached (pool timeout, IO, TLS, closed pool).
    #[error("Catalog database unreachable: {0}")]
    Connectivity(String),

    /// The database answered but the statement failed (bad SQL, decode error).
    #[error("Catalog query failed: {0}")]
    Query(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
            | sqlx::Error::Configuration(_) => CatalogError::Connectivity(err.to_string()),
            other => CatalogError::Query(other.to_string()),
        }
    }
}

/// Failures reported by a completion provider.
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("LLM request failed: {source}")]
    Transport {
        #[from]
        source: reqwest::Error,
    },

    #[error("LLM provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("LLM provider returned an empty completion")]
    EmptyCompletion,
}

/// Type alias for Result using anyhow::Error at the application edge.
pub type Result<T> = anyhow::Result<T>;

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let config_err = ShopError::Config("database user is not set".to_string());
        assert_eq!(
            config_err.to_string(),
            "Configuration error: database user is not set"
        );

        let catalog_err: ShopError = CatalogError::Query("Unknown column 'x'".into()).into();
        assert_eq!(catalog_err.to_string(), "Catalog query failed: Unknown column 'x'");

        let status = LlmError::Status {
            status: 429,
            body: "rate limited".into(),
        };
        assert_eq!(status.to_string(), "LLM provider returned 429: rate limited");
    }

    #[test]
    fn test_sqlx_error_classification() {
        assert!(matches!(
            CatalogError::from(sqlx::Error::PoolTimedOut),
            CatalogError::Connectivity(_)
        ));
        assert!(matches!(
            CatalogError::from(sqlx::Error::RowNotFound),
            CatalogError::Query(_)
        ));
        assert!(matches!(
            CatalogError::from(sqlx::Error::ColumnNotFound("status".into())),
            CatalogError::Query(_)
        ));
    }
}
