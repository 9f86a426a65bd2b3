//! # Completion Provider (`common::llm`)
//!
//! File: cli/src/common/llm/mod.rs
//!
//! ## Overview
//!
//! Text completion is an opaque collaborator: a prompt goes in, text comes out.
//! `CompletionProvider` is that seam. The production implementation,
//! `client::ChatCompletionsClient`, talks to any OpenAI-compatible
//! `/chat/completions` endpoint (Groq, OpenAI, a local Ollama).
//!
//! One provider is built at startup and shared as `Arc<dyn CompletionProvider>`
//! by every session and request; the underlying `reqwest::Client` keeps its own
//! connection pool.
//!
use crate::core::error::LlmError;
use async_trait::async_trait;

pub mod client;

pub use client::ChatCompletionsClient;

/// A single-turn text completion service.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Returns the model's reply to `prompt`, trimmed. Never returns an empty string.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Model identifier, for logging.
    fn model(&self) -> &str;
}
