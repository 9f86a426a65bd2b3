//! # ShopAssist Command Modules
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level commands of the `shopassist` binary. Each module defines its
//! clap argument struct and an async `handle_*` function that `main.rs` calls
//! with the parsed arguments and the loaded `Config`.
//!
//! - `chat`: interactive shopping conversation on the terminal
//! - `serve`: HTTP chat endpoint for the storefront widget
//! - `catalog`: prints category / size / color option lists
//!

/// Interactive terminal session.
pub mod chat;
/// Option lists straight from the catalog database.
pub mod catalog;
/// HTTP chat endpoint.
pub mod serve;
