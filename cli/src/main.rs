//! # ShopAssist Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the `shopassist` binary.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Loading `.env` and the layered configuration
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! shopassist --help
//!
//! # Chat on the terminal with info-level logs
//! shopassist -v chat
//!
//! # Serve the chat endpoint with an explicit config file
//! shopassist --config ~/shop/prod.toml serve --port 8080
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Load `.env` (if present), then configure logging
//! 3. Load configuration (file, then environment)
//! 4. Route to the command handler
//! 5. Print any error and exit with status 1
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Command handlers (chat, serve, catalog)
mod common; // Catalog, LLM, pitches, FAQ, shared services
mod core; // Errors and configuration

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "shopassist",
    about = "🛒 ShopAssist: catalog-backed shopping assistant",
    long_about = "Find products by category, size and color, with a short generated pitch\n\
                  for each match. Runs as an interactive chat or as an HTTP chat endpoint.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file (default: nearest .shopassist.toml, then the user config file).
    #[arg(long, global = true, env = "SHOPASSIST_CONFIG")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Interactive shopping conversation on the terminal.
    #[command(alias = "c")]
    Chat(commands::chat::ChatArgs),
    /// Serve the HTTP chat endpoint.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Print catalog option lists.
    Catalog(commands::catalog::CatalogArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Missing .env is normal; anything set in the real environment wins.
    let dotenv_path = dotenvy::dotenv().ok();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);
    if let Some(path) = dotenv_path {
        tracing::info!("Loaded environment from {}", path.display());
    }

    let command_result = match crate::core::config::load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Chat(args) => commands::chat::handle_chat(args, config).await,
            Commands::Serve(args) => commands::serve::handle_serve(args, config).await,
            Commands::Catalog(args) => commands::catalog::handle_catalog(args, config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
