//! # FAQ Responder (`common::faq`)
//!
//! File: cli/src/common/faq.rs
//!
//! The chat endpoint's `choice = "1"` flow. The knowledge base behind it is an
//! external collaborator; `FaqResponder` is its interface and `LlmFaqResponder`
//! answers directly from the completion provider. Timing is measured by the
//! caller.
//!
use crate::common::llm::CompletionProvider;
use crate::core::error::LlmError;
use async_trait::async_trait;
use std::sync::Arc;

/// Shown when a question could not be answered.
pub const FAQ_NO_ANSWER: &str = "Sorry, I couldn't find an answer.";

#[async_trait]
pub trait FaqResponder: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, LlmError>;
}

/// Answers shop questions with the shared completion provider.
pub struct LlmFaqResponder {
    provider: Arc<dyn CompletionProvider>,
}

impl LlmFaqResponder {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self { provider }
    }
}

fn faq_prompt(question: &str) -> String {
    format!(
        "You are the customer support assistant of an online clothing and shoe shop. \
         Answer the customer's question briefly and politely. If you do not know the \
         answer, say so and suggest contacting customer support.\n\n\
         Question: {question}\n\nAnswer:"
    )
}

#[async_trait]
impl FaqResponder for LlmFaqResponder {
    async fn answer(&self, question: &str) -> Result<String, LlmError> {
        self.provider.complete(&faq_prompt(question.trim())).await
    }
}
