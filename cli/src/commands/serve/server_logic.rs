//! # ShopAssist HTTP Server Implementation
//!
//! File: cli/src/commands/serve/server_logic.rs
//!
//! ## Overview
//!
//! The Axum server behind `shopassist serve`:
//! - `POST /api/chat` hands the body to the dispatcher and always answers 200
//! - `GET /health` answers `{"status":"ok"}` without touching the catalog
//! - Port availability checking with automatic fallback
//! - Permissive CORS (unless disabled) and request tracing
//! - Graceful shutdown on Ctrl+C / SIGTERM
//!
//! The request body is read as raw bytes and parsed here, so a malformed body
//! still gets a `{"content": "Error: ..."}` reply instead of axum's 4xx rejection.
//!
use super::dispatcher::{self, ChatReply, ChatRequest};
use crate::common::services::Services;
use crate::core::config::ServerConfig;
use crate::core::error::Result;
use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

/// Binds the configured address (or the next free port) and serves until shutdown.
pub async fn run_server(config: ServerConfig, services: Services) -> Result<()> {
    let max_port_attempts = 10;
    let addr = find_available_port(config.host, config.port, max_port_attempts).await?;

    let app = create_app(services, config.enable_cors);

    println!("\n=================================================================");
    println!("🛒 Chat endpoint:     http://{}/api/chat", addr);
    println!("💓 Health check:      http://{}/health", addr);
    println!("🔒 CORS enabled:      {}", config.enable_cors);
    println!("=================================================================\n");

    info!("Starting chat server on {}", addr);
    println!("Server starting! Press Ctrl+C to stop.");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind TCP listener to address {}", addr))?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    println!("\nServer shutdown complete.");
    Ok(())
}

/// Resolves when Ctrl+C or (on Unix) SIGTERM arrives.
async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, initiating graceful shutdown..."),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut term) => {
                term.recv().await;
                info!("Received SIGTERM, initiating graceful shutdown...");
            }
            Err(e) => {
                error!(
                    "Failed to install SIGTERM handler: {}. Shutdown on SIGTERM might not work.",
                    e
                );
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Tries `start_port` and up to `max_attempts - 1` following ports.
async fn find_available_port(
    req_host: std::net::IpAddr,
    start_port: u16,
    max_attempts: u8,
) -> Result<SocketAddr> {
    let mut current_port = start_port;

    for attempt in 0..max_attempts {
        let addr = SocketAddr::new(req_host, current_port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                drop(listener);
                if attempt > 0 {
                    info!(
                        "Port {} was unavailable, successfully bound to available port {}.",
                        start_port, current_port
                    );
                }
                return Ok(addr);
            }
            Err(e) => {
                warn!(
                    "Attempt {}: Port {} on host {} is unavailable (Error: {}). Trying next port...",
                    attempt + 1,
                    current_port,
                    req_host,
                    e
                );
                current_port = match current_port.checked_add(1) {
                    Some(next) => next,
                    None => break,
                };
            }
        }
    }

    anyhow::bail!(
        "Could not find an available port on host {} starting from port {} after trying {} ports.",
        req_host,
        start_port,
        max_attempts
    )
}

/// Builds the router with the chat and health routes plus tracing and CORS layers.
pub fn create_app(services: Services, enable_cors: bool) -> Router {
    let cors_layer = if enable_cors {
        info!("CORS middleware enabled (permissive).");
        Some(CorsLayer::permissive())
    } else {
        info!("CORS middleware disabled.");
        None
    };

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::default().include_headers(true))
        .on_request(DefaultOnRequest::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/api/chat", post(chat))
        .route("/health", get(health))
        .with_state(services)
        .layer(
            ServiceBuilder::new()
                .layer(trace_layer)
                .option_layer(cors_layer),
        )
}

async fn chat(State(services): State<Services>, body: Bytes) -> Json<ChatReply> {
    let request: ChatRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!("Rejected malformed chat request body: {}", e);
            return Json(ChatReply::error(format!("invalid request body ({})", e)));
        }
    };
    Json(dispatcher::dispatch(&services, request).await)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
