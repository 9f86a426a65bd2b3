//! Shared service handles built once per process from configuration.
use crate::common::catalog::mysql::MySqlCatalog;
use crate::common::catalog::Catalog;
use crate::common::faq::{FaqResponder, LlmFaqResponder};
use crate::common::llm::{ChatCompletionsClient, CompletionProvider};
use crate::common::pitch::PitchGenerator;
use crate::core::config::Config;
use crate::core::error::{Result, ShopError};
use std::sync::Arc;
use tracing::info;

/// Everything the shopping flows need, cheap to clone.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn Catalog>,
    pub pitches: PitchGenerator,
    pub faq: Arc<dyn FaqResponder>,
    /// Default storefront base URL for product links.
    pub storefront_base_url: String,
}

impl Services {
    /// Builds the catalog pool and the completion client.
    ///
    /// Fails with `ShopError::Config` when database or LLM credentials are missing.
    pub fn from_config(config: &Config) -> Result<Self> {
        let catalog = build_catalog(config)?;
        config.require_llm()?;
        let provider: Arc<dyn CompletionProvider> = Arc::new(
            ChatCompletionsClient::new(&config.llm).map_err(ShopError::from)?,
        );
        info!(model = provider.model(), "Completion provider ready");

        let mut services = Self::new(catalog, provider, config.storefront.base_url.clone());
        services.pitches = services
            .pitches
            .with_max_concurrency(config.llm.max_concurrency);
        Ok(services)
    }

    pub fn new(
        catalog: Arc<dyn Catalog>,
        provider: Arc<dyn CompletionProvider>,
        storefront_base_url: String,
    ) -> Self {
        Self {
            catalog,
            pitches: PitchGenerator::new(provider.clone()),
            faq: Arc::new(LlmFaqResponder::new(provider)),
            storefront_base_url,
        }
    }
}

/// Builds only the catalog, for commands that never call the model.
pub fn build_catalog(config: &Config) -> Result<Arc<dyn Catalog>> {
    config.require_database()?;
    let catalog = MySqlCatalog::connect_lazy(&config.database, &config.catalog)?;
    Ok(Arc::new(catalog))
}
