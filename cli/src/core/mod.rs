//! # ShopAssist Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces shared by every command:
//! - `config`: layered configuration loading (defaults, TOML file, environment) and validation
//! - `error`: typed error enums and the application `Result` alias
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{ShopError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
