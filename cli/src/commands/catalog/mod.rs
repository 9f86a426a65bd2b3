//! # ShopAssist Catalog Lookups
//!
//! File: cli/src/commands/catalog/mod.rs
//!
//! ## Overview
//!
//! `shopassist catalog` prints the option lists the chat flows offer, straight
//! from the catalog database. Useful for checking credentials and for finding
//! ids to use with `find_products`.
//!
//! ```bash
//! shopassist catalog categories
//! shopassist catalog colors --json
//! ```
//!
//! The model is never called, so only `[database]` settings are required.
//!
use crate::common::catalog::OptionMap;
use crate::common::services::build_catalog;
use crate::core::config::Config;
use crate::core::error::Result;
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::info;

/// Arguments for the `shopassist catalog` command group.
#[derive(Parser, Debug)]
pub struct CatalogArgs {
    #[command(subcommand)]
    command: CatalogCommand,
}

#[derive(Subcommand, Debug)]
enum CatalogCommand {
    /// List product categories.
    Categories(ListArgs),
    /// List size options.
    Sizes(ListArgs),
    /// List color options.
    Colors(ListArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    /// Print a JSON object of `{"id": "label"}` instead of a table.
    #[arg(long)]
    json: bool,
}

/// Entry point for `shopassist catalog`.
pub async fn handle_catalog(args: CatalogArgs, config: Config) -> Result<()> {
    info!("Handling catalog command with args: {:?}", args);
    let catalog = build_catalog(&config)?;

    let (what, list_args, options) = match args.command {
        CatalogCommand::Categories(list_args) => {
            ("categories", list_args, catalog.categories().await)
        }
        CatalogCommand::Sizes(list_args) => ("sizes", list_args, catalog.sizes().await),
        CatalogCommand::Colors(list_args) => ("colors", list_args, catalog.colors().await),
    };
    let options = options.with_context(|| format!("Failed to list {}", what))?;

    print!("{}", render_options(&options, list_args.json)?);
    Ok(())
}

fn render_options(options: &OptionMap, json: bool) -> Result<String> {
    if json {
        let object: serde_json::Map<String, serde_json::Value> = options
            .iter()
            .map(|(id, label)| (id.to_string(), label.clone().into()))
            .collect();
        return Ok(serde_json::to_string_pretty(&object)? + "\n");
    }

    if options.is_empty() {
        return Ok("(none)\n".to_string());
    }
    let width = options
        .keys()
        .map(|id| id.to_string().len())
        .max()
        .unwrap_or(1);
    Ok(options
        .iter()
        .map(|(id, label)| format!("{:>width$}  {}\n", id, label, width = width))
        .collect())
}
