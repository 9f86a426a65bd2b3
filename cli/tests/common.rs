//! # ShopAssist CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each `.rs` file
//! there is compiled as its own test crate and runs the compiled
//! `shopassist` binary.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::Path;

/// Environment variables that would leak a developer's real settings into a test run.
const CONFIG_ENV_VARS: &[&str] = &[
    "MYSQL_HOST",
    "MYSQL_PORT",
    "MYSQL_USER",
    "MYSQL_PASSWORD",
    "MYSQL_DATABASE",
    "LLM_API_KEY",
    "GROQ_API_KEY",
    "LLM_MODEL",
    "LLM_BASE_URL",
    "STOREFRONT_BASE_URL",
    "SHOPASSIST_CONFIG",
    "RUST_LOG",
];

/// Creates a `Command` for the compiled `shopassist` binary.
pub fn shopassist_cmd() -> Command {
    Command::cargo_bin("shopassist").expect("Failed to find shopassist binary for testing")
}

/// A `shopassist` command running in `dir` with no configuration from the
/// host: config variables are removed and the user config directory points into `dir`.
pub fn isolated_cmd(dir: &Path) -> Command {
    let mut cmd = shopassist_cmd();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"));
    for var in CONFIG_ENV_VARS {
        cmd.env_remove(var);
    }
    cmd
}
