//! # Interactive Shopping Session
//!
//! File: cli/src/commands/chat/session.rs
//!
//! ## Overview
//!
//! Drives one conversation as a small state machine:
//!
//! ```text
//! AwaitingCategory -> AwaitingSize -> AwaitingColor -> Matching -> Presenting
//!        ^                                                            |
//!        +------------------ AwaitingContinue <-----------------------+
//!                                   |
//!                               Terminated
//! ```
//!
//! - An unknown name re-prompts the same state.
//! - `quit`, `exit` or `bye` at any prompt, end of input, or anything but
//!   `yes` / `y` at the continue prompt ends the session.
//! - "No products" and "search failed" produce different messages.
//!
//! Input and output are generic so that tests can drive a session from a byte
//! slice and capture everything it prints.
//!
use crate::common::catalog::{find_products, resolve_option, OptionMap, Product};
use crate::common::services::Services;
use crate::common::suggest::suggest_products;
use crate::core::error::{CatalogError, Result};
use anyhow::Context;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::{debug, warn};

const CATEGORY_PROMPT: &str = "\nWhich category are you interested in? (or type 'quit' to exit): ";
const SIZE_PROMPT: &str = "\nWhich size are you looking for?: ";
const COLOR_PROMPT: &str = "\nWhich color do you prefer?: ";
const CONTINUE_PROMPT: &str = "\nWould you like to search again? (yes/no): ";

const FAREWELL_QUIT: &str = "Thanks for visiting! Come back anytime! 👋";
const FAREWELL_DONE: &str = "Thanks for shopping with us! Hope to see you again soon! 👋";

/// An option the shopper picked, with the label as they typed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: i64,
    pub label: String,
}

/// States of the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingCategory,
    AwaitingSize {
        category: Selection,
    },
    AwaitingColor {
        category: Selection,
        size: Selection,
    },
    Matching {
        category: Selection,
        size: Selection,
        color: Selection,
    },
    Presenting {
        products: Vec<Product>,
    },
    AwaitingContinue,
    Terminated,
}

/// The option lists a session resolves names against, loaded once at start.
#[derive(Debug, Clone, Default)]
pub struct SessionOptions {
    pub categories: OptionMap,
    pub sizes: OptionMap,
    pub colors: OptionMap,
}

impl SessionOptions {
    pub async fn load(services: &Services) -> std::result::Result<Self, CatalogError> {
        Ok(Self {
            categories: services.catalog.categories().await?,
            sizes: services.catalog.sizes().await?,
            colors: services.catalog.colors().await?,
        })
    }
}

fn is_exit_word(input: &str) -> bool {
    matches!(input.to_lowercase().as_str(), "quit" | "exit" | "bye")
}

/// A running conversation over `input` / `out`.
pub struct Session<'a, R, W> {
    services: &'a Services,
    options: SessionOptions,
    lines: Lines<R>,
    out: W,
}

impl<'a, R, W> Session<'a, R, W>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    pub fn new(services: &'a Services, options: SessionOptions, input: R, out: W) -> Self {
        Self {
            services,
            options,
            lines: input.lines(),
            out,
        }
    }

    /// Prints the available options and runs until the session terminates.
    pub async fn run(mut self) -> Result<()> {
        self.print_options()?;

        let mut state = SessionState::AwaitingCategory;
        while state != SessionState::Terminated {
            debug!(?state, "Session step");
            state = self.step(state).await?;
        }
        Ok(())
    }

    async fn step(&mut self, state: SessionState) -> Result<SessionState> {
        let next = match state {
            SessionState::AwaitingCategory => match self.ask(CATEGORY_PROMPT).await? {
                None => self.farewell(FAREWELL_QUIT)?,
                Some(answer) => match resolve_option(&self.options.categories, &answer) {
                    Some(id) => SessionState::AwaitingSize {
                        category: Selection { id, label: answer },
                    },
                    None => {
                        self.say("Invalid category. Please choose from the available options.")?;
                        SessionState::AwaitingCategory
                    }
                },
            },
            SessionState::AwaitingSize { category } => match self.ask(SIZE_PROMPT).await? {
                None => self.farewell(FAREWELL_QUIT)?,
                Some(answer) => match resolve_option(&self.options.sizes, &answer) {
                    Some(id) => SessionState::AwaitingColor {
                        category,
                        size: Selection { id, label: answer },
                    },
                    None => {
                        self.say("Invalid size. Please choose from the available options.")?;
                        SessionState::AwaitingSize { category }
                    }
                },
            },
            SessionState::AwaitingColor { category, size } => match self.ask(COLOR_PROMPT).await? {
                None => self.farewell(FAREWELL_QUIT)?,
                Some(answer) => match resolve_option(&self.options.colors, &answer) {
                    Some(id) => SessionState::Matching {
                        category,
                        size,
                        color: Selection { id, label: answer },
                    },
                    None => {
                        self.say("Invalid color. Please choose from the available options.")?;
                        SessionState::AwaitingColor { category, size }
                    }
                },
            },
            SessionState::Matching {
                category,
                size,
                color,
            } => {
                match find_products(
                    self.services.catalog.as_ref(),
                    category.id,
                    size.id,
                    color.id,
                )
                .await
                {
                    Ok(products) if products.is_empty() => {
                        self.say(&format!(
                            "No products found for {} in size {} and color {}. 😔",
                            category.label, size.label, color.label
                        ))?;
                        SessionState::AwaitingContinue
                    }
                    Ok(products) => SessionState::Presenting { products },
                    Err(e) => {
                        warn!("Product search failed: {}", e);
                        self.say(&format!(
                            "Sorry, the product search failed ({}). Please try again later.",
                            e
                        ))?;
                        SessionState::AwaitingContinue
                    }
                }
            }
            SessionState::Presenting { products } => {
                let suggestions = suggest_products(
                    &self.services.pitches,
                    &products,
                    &self.services.storefront_base_url,
                )
                .await;
                self.say("\nHere are some products you might like:")?;
                for suggestion in suggestions {
                    self.say(&format!(
                        "- {}\n  Why buy this product? {}\n  {}\n",
                        suggestion.name, suggestion.recommendation, suggestion.url
                    ))?;
                }
                SessionState::AwaitingContinue
            }
            SessionState::AwaitingContinue => match self.ask(CONTINUE_PROMPT).await? {
                Some(answer) if matches!(answer.to_lowercase().as_str(), "yes" | "y") => {
                    SessionState::AwaitingCategory
                }
                _ => self.farewell(FAREWELL_DONE)?,
            },
            SessionState::Terminated => SessionState::Terminated,
        };
        Ok(next)
    }

    /// Prompts and reads one trimmed answer. `None` means the shopper wants to
    /// leave (exit word) or input ended.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{}", prompt).context("Failed to write prompt")?;
        self.out.flush().context("Failed to flush output")?;

        let Some(line) = self
            .lines
            .next_line()
            .await
            .context("Failed to read input")?
        else {
            writeln!(self.out).context("Failed to write output")?;
            return Ok(None);
        };

        let answer = line.trim().to_string();
        if is_exit_word(&answer) {
            return Ok(None);
        }
        Ok(Some(answer))
    }

    fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.out, "{}", text).context("Failed to write output")
    }

    fn farewell(&mut self, text: &str) -> Result<SessionState> {
        self.say(text)?;
        Ok(SessionState::Terminated)
    }

    fn print_options(&mut self) -> Result<()> {
        let sections = [
            ("Available product categories:", self.options.categories.clone()),
            ("Available sizes:", self.options.sizes.clone()),
            ("Available colors:", self.options.colors.clone()),
        ];
        for (title, options) in sections {
            self.say(&format!("\n{}", title))?;
            if options.is_empty() {
                self.say("  (none available)")?;
            }
            for label in options.values() {
                self.say(&format!("- {}", label))?;
            }
        }
        Ok(())
    }
}
