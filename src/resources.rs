// ABOUTME: Shared server resources: cache, catalog, provider, resolver, analyzer, and chat assistant
// ABOUTME: Built once at startup and handed to every route as Arc<ServerResources>
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use tracing::info;

use crate::cache::factory::Cache;
use crate::cache::CacheStore;
use crate::catalog::FoodCatalog;
use crate::chat::NutritionAssistant;
use crate::config::ServerConfig;
use crate::detection::MealAnalyzer;
use crate::errors::AppResult;
use crate::external::{NutritionProvider, UsdaClient};
use crate::llm::{LlmProvider, OpenAiCompatibleProvider};
use crate::resolver::MacroResolver;

/// Everything request handlers need, shared read-only across requests
pub struct ServerResources {
    /// Provider response cache
    pub cache: Arc<dyn CacheStore>,
    /// Local food table
    pub catalog: Arc<FoodCatalog>,
    /// Remote food database
    pub provider: Arc<dyn NutritionProvider>,
    /// Tiered resolution engine
    pub resolver: Arc<MacroResolver>,
    /// Detection batch pipeline
    pub analyzer: MealAnalyzer,
    /// Chat replies
    pub assistant: NutritionAssistant,
}

impl ServerResources {
    /// Build resources from configuration
    ///
    /// Opens the cache, enriches the catalog from it, and creates the USDA and
    /// optional LLM clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be opened or an HTTP client cannot
    /// be created
    pub async fn initialize(config: &ServerConfig) -> AppResult<Self> {
        let cache: Arc<dyn CacheStore> = Arc::new(Cache::new(&config.cache).await?);
        let catalog = Arc::new(FoodCatalog::load(cache.as_ref()).await?);
        let provider: Arc<dyn NutritionProvider> = Arc::new(UsdaClient::new(
            config.usda.client_config(),
            Arc::clone(&cache),
        )?);
        let llm: Option<Arc<dyn LlmProvider>> = match &config.llm {
            Some(settings) => Some(Arc::new(OpenAiCompatibleProvider::new(
                settings.provider_config(),
            )?)),
            None => None,
        };

        info!(
            cache = cache.backend_name(),
            foods = catalog.len(),
            llm = llm.is_some(),
            "Server resources initialized"
        );

        Ok(Self::from_parts(
            cache,
            catalog,
            provider,
            llm,
            config.detection_min_confidence,
        ))
    }

    /// Assemble resources from already-built components
    #[must_use]
    pub fn from_parts(
        cache: Arc<dyn CacheStore>,
        catalog: Arc<FoodCatalog>,
        provider: Arc<dyn NutritionProvider>,
        llm: Option<Arc<dyn LlmProvider>>,
        detection_min_confidence: f64,
    ) -> Self {
        let resolver = Arc::new(MacroResolver::new(
            Arc::clone(&catalog),
            Arc::clone(&cache),
            Arc::clone(&provider),
        ));
        Self {
            analyzer: MealAnalyzer::new(Arc::clone(&resolver), detection_min_confidence),
            assistant: NutritionAssistant::new(Arc::clone(&resolver), llm),
            cache,
            catalog,
            provider,
            resolver,
        }
    }
}
