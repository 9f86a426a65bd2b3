//! # Pitch Generator (`common::pitch`)
//!
//! File: cli/src/common/pitch/mod.rs
//!
//! ## Overview
//!
//! Turns a product description into a one-sentence sales pitch:
//!
//! 1. A blank description yields `PITCH_UNAVAILABLE` without calling the model.
//! 2. HTML is reduced to its visible text (`text::visible_text`).
//! 3. A fixed prompt asks the model for exactly one short sentence.
//! 4. The reply is shaped to a single bounded sentence (`text::shape_pitch`).
//! 5. Any failure (transport error, error status, empty or unusable reply)
//!    yields `PITCH_FALLBACK`.
//!
//! `PitchGenerator::pitch` therefore always returns displayable text. Pitches
//! are not cached; every call is a fresh completion.
//!
use crate::common::llm::CompletionProvider;
use std::sync::Arc;
use tracing::{debug, warn};

pub mod text;

/// Returned for products without any description text.
pub const PITCH_UNAVAILABLE: &str = "Product description not available.";
/// Returned when the completion provider fails or replies with nothing usable.
pub const PITCH_FALLBACK: &str = "A great pick worth a closer look.";

/// Builds the prompt for one product's visible description text.
pub fn build_prompt(description_text: &str) -> String {
    format!(
        "The following is a product description from an online shop:\n\n\
         {description_text}\n\n\
         Write exactly one concise, compelling sentence of at most 30 words that \
         pitches this product to a shopper. Focus on the key benefit and selling \
         point without repeating the description. Reply with the sentence only, \
         without quotes or labels.\n\nPitch:"
    )
}

/// Default for `max_concurrency`, matching `[llm] max_concurrency`.
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Generates pitches through a shared completion provider.
#[derive(Clone)]
pub struct PitchGenerator {
    provider: Arc<dyn CompletionProvider>,
    max_concurrency: usize,
}

impl PitchGenerator {
    pub fn new(provider: Arc<dyn CompletionProvider>) -> Self {
        Self {
            provider,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
        }
    }

    /// Caps how many pitches of one result set are generated at once (minimum 1).
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    /// Returns a pitch for `description` (plain text or HTML). Never fails.
    pub async fn pitch(&self, description: &str) -> String {
        let visible = text::visible_text(description);
        if visible.is_empty() {
            return PITCH_UNAVAILABLE.to_string();
        }

        let prompt = build_prompt(&visible);
        match self.provider.complete(&prompt).await {
            Ok(reply) => match text::shape_pitch(&reply) {
                Some(pitch) => {
                    debug!(model = self.provider.model(), "Pitch generated");
                    pitch
                }
                None => {
                    warn!(model = self.provider.model(), "Unusable pitch reply: {:?}", reply);
                    PITCH_FALLBACK.to_string()
                }
            },
            Err(e) => {
                warn!(model = self.provider.model(), "Pitch generation failed: {}", e);
                PITCH_FALLBACK.to_string()
            }
        }
    }
}
