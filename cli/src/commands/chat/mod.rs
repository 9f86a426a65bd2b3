//! # ShopAssist Interactive Chat
//!
//! File: cli/src/commands/chat/mod.rs
//!
//! ## Overview
//!
//! `shopassist chat` runs the shopping conversation on the terminal: it lists
//! the available categories, sizes and colors, asks for one of each, and
//! prints the matching products with a generated pitch and a storefront link.
//!
//! ## Examples
//!
//! ```bash
//! shopassist chat
//! shopassist --config ./staging.toml -v chat
//! ```
//!
//! The conversation logic lives in `session.rs`; this module builds the shared
//! services from configuration and hands stdin/stdout to a session.
//!
use crate::common::services::Services;
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use tracing::info;

pub mod session;

use session::{Session, SessionOptions};

/// Arguments for `shopassist chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Storefront base URL used for product links (overrides config and STOREFRONT_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Entry point for `shopassist chat`.
pub async fn handle_chat(args: ChatArgs, mut config: Config) -> Result<()> {
    info!("Handling chat command with args: {:?}", args);
    if let Some(base_url) = args.base_url {
        config.override_storefront_base_url(base_url)?;
    }

    let services = Services::from_config(&config)?;
    let options = SessionOptions::load(&services)
        .await
        .context("Could not load the product options from the catalog")?;

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    Session::new(&services, options, stdin, std::io::stdout())
        .run()
        .await
}
