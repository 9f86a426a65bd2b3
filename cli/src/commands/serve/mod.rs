//! # ShopAssist Chat Server
//!
//! File: cli/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! `shopassist serve` exposes the shopping assistant over HTTP for a web chat
//! widget. A single `POST /api/chat` route accepts `{"choice", "input"}` and
//! answers with `{"content": ...}`; see `dispatcher.rs` for the command table.
//!
//! ## Architecture
//!
//! - `dispatcher.rs`: request parsing and routing to FAQ / catalog / pitches
//! - `server_logic.rs`: Axum router, middleware, port fallback, shutdown
//!
//! ## Examples
//!
//! ```bash
//! # Serve on the configured address (127.0.0.1:5000 by default)
//! shopassist serve
//!
//! # Listen on all interfaces without CORS headers
//! shopassist serve --host 0.0.0.0 --port 8080 --no-cors
//! ```
//!
//! Command-line flags override `[server]` in the config file.
//!
use crate::common::services::Services;
use crate::core::config::Config;
use crate::core::error::Result;
use clap::Parser;
use std::net::IpAddr;
use tracing::info;

/// Request parsing and routing for `/api/chat`.
pub mod dispatcher;

/// Axum server setup.
pub mod server_logic;

/// Arguments for `shopassist serve`.
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind (defaults to `[server] host`, 127.0.0.1).
    #[arg(long)]
    pub host: Option<IpAddr>,

    /// Port to listen on (defaults to `[server] port`, 5000).
    /// The next free port is used if this one is taken.
    #[arg(long, short)]
    pub port: Option<u16>,

    /// Do not send CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// Storefront base URL used for product links (overrides config and STOREFRONT_BASE_URL).
    #[arg(long)]
    pub base_url: Option<String>,
}

/// Entry point for `shopassist serve`.
pub async fn handle_serve(args: ServeArgs, mut config: Config) -> Result<()> {
    info!("Handling serve command with args: {:?}", args);

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if args.no_cors {
        config.server.enable_cors = false;
    }
    if let Some(base_url) = args.base_url {
        config.override_storefront_base_url(base_url)?;
    }
    info!("Effective server config: {:?}", config.server);

    let services = Services::from_config(&config)?;
    server_logic::run_server(config.server, services).await
}
