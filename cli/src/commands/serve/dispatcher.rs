//! # Chat Request Dispatcher
//!
//! File: cli/src/commands/serve/dispatcher.rs
//!
//! ## Overview
//!
//! Routes one `POST /api/chat` body to the FAQ flow or to a shopping command:
//!
//! | `choice` | `input`                                 | `content`                         |
//! |----------|-----------------------------------------|-----------------------------------|
//! | `"1"`    | any question                            | answer text (+ `processing_time`) |
//! | `"2"`    | `get_categories`/`get_sizes`/`get_colors` | `{id: label}` map               |
//! | `"2"`    | `find_products <cat> <size> <color>`    | list of product suggestions       |
//! | other    |                                         | `"Invalid choice..."`             |
//!
//! Every outcome, including validation and catalog failures, is a `ChatReply`
//! that the route returns with status 200. Failures are readable strings in
//! `content`.
//!
use crate::common::catalog::{find_products, OptionMap};
use crate::common::faq::FAQ_NO_ANSWER;
use crate::common::services::Services;
use crate::common::suggest::suggest_products;
use crate::core::error::ShopError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Instant;
use tracing::{info, warn};

pub const INVALID_CHOICE: &str = "Invalid choice. Please select a valid option.";
pub const INVALID_COMMAND: &str = "Invalid shopping assistant command.";
pub const INVALID_FORMAT: &str =
    "Invalid command format. Use: find_products <category_id> <size_id> <color_id>";
pub const INVALID_ID: &str = "Invalid ID format. Category, size and color IDs must be integers.";
pub const EMPTY_QUESTION: &str = "Please enter a question.";

/// Incoming chat request body.
#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    /// `"1"` (FAQ) or `"2"` (shopping); numbers are accepted too.
    #[serde(default)]
    pub choice: Option<Value>,
    #[serde(default)]
    pub input: Option<String>,
    /// Overrides the configured storefront base URL for product links.
    #[serde(default)]
    pub base_url: Option<String>,
}

/// Response body. `processing_time` is only present for FAQ answers.
#[derive(Debug, Serialize, PartialEq)]
pub struct ChatReply {
    pub content: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time: Option<f64>,
}

impl ChatReply {
    fn content(content: impl Into<Value>) -> Self {
        Self {
            content: content.into(),
            processing_time: None,
        }
    }

    /// Reply for an internal failure.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::content(format!("Error: {}", message))
    }
}

/// A parsed shopping command (`choice = "2"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoppingCommand {
    Categories,
    Sizes,
    Colors,
    FindProducts {
        category_id: i64,
        size_id: i64,
        color_id: i64,
    },
}

impl ShoppingCommand {
    /// Parses the `input` field. Errors are `ShopError::Validation` with a user-facing message.
    pub fn parse(input: &str) -> Result<Self, ShopError> {
        let input = input.trim();
        match input {
            "get_categories" => return Ok(Self::Categories),
            "get_sizes" => return Ok(Self::Sizes),
            "get_colors" => return Ok(Self::Colors),
            _ => {}
        }

        let tokens: Vec<&str> = input.split_whitespace().collect();
        if tokens.first() != Some(&"find_products") {
            return Err(ShopError::Validation(INVALID_COMMAND.into()));
        }
        let [_, category, size, color] = tokens[..] else {
            return Err(ShopError::Validation(INVALID_FORMAT.into()));
        };
        let parse_id = |token: &str| {
            token
                .parse::<i64>()
                .map_err(|_| ShopError::Validation(INVALID_ID.into()))
        };
        Ok(Self::FindProducts {
            category_id: parse_id(category)?,
            size_id: parse_id(size)?,
            color_id: parse_id(color)?,
        })
    }
}

fn choice_key(choice: Option<&Value>) -> Option<String> {
    match choice? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Handles one chat request.
pub async fn dispatch(services: &Services, request: ChatRequest) -> ChatReply {
    let input = request.input.as_deref().unwrap_or_default().trim().to_string();
    match choice_key(request.choice.as_ref()).as_deref() {
        Some("1") => answer_faq(services, &input).await,
        Some("2") => {
            let base_url = request
                .base_url
                .as_deref()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or(&services.storefront_base_url);
            shop(services, &input, base_url).await
        }
        other => {
            info!(choice = ?other, "Rejected chat request with unknown choice");
            ChatReply::content(INVALID_CHOICE)
        }
    }
}

async fn answer_faq(services: &Services, question: &str) -> ChatReply {
    if question.is_empty() {
        return ChatReply::content(EMPTY_QUESTION);
    }
    let started = Instant::now();
    let answer = match services.faq.answer(question).await {
        Ok(answer) if !answer.trim().is_empty() => answer.trim().to_string(),
        Ok(_) => FAQ_NO_ANSWER.to_string(),
        Err(e) => {
            warn!("FAQ answer failed: {}", e);
            FAQ_NO_ANSWER.to_string()
        }
    };
    ChatReply {
        content: Value::String(answer),
        processing_time: Some(started.elapsed().as_secs_f64()),
    }
}

async fn shop(services: &Services, input: &str, base_url: &str) -> ChatReply {
    let command = match ShoppingCommand::parse(input) {
        Ok(command) => command,
        Err(e) => return ChatReply::content(e.to_string()),
    };
    info!(?command, "Shopping command");

    let catalog = services.catalog.as_ref();
    let result = match command {
        ShoppingCommand::Categories => catalog.categories().await.map(options_json),
        ShoppingCommand::Sizes => catalog.sizes().await.map(options_json),
        ShoppingCommand::Colors => catalog.colors().await.map(options_json),
        ShoppingCommand::FindProducts {
            category_id,
            size_id,
            color_id,
        } => match find_products(catalog, category_id, size_id, color_id).await {
            Ok(products) => {
                let suggestions = suggest_products(&services.pitches, &products, base_url).await;
                Ok(serde_json::to_value(suggestions).unwrap_or_else(|_| Value::Array(Vec::new())))
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(content) => ChatReply::content(content),
        Err(e) => ChatReply::error(e),
    }
}

fn options_json(options: OptionMap) -> Value {
    Value::Object(
        options
            .into_iter()
            .map(|(id, label)| (id.to_string(), Value::String(label)))
            .collect(),
    )
}
