// ABOUTME: Tiered macro resolution: local catalog, provider cache, remote provider, fixed default
// ABOUTME: Each tier is a ResolutionStrategy returning a tagged outcome; the first decisive one wins
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Macro Resolver
//!
//! Turns a food label and a portion size into a [`ResolvedFood`]. Strategies
//! are evaluated in order and short-circuit on the first outcome that is not
//! [`TierOutcome::Miss`]:
//!
//! 1. [`LocalCatalogStrategy`] - exact catalog match; zero-calorie records are
//!    [`TierOutcome::NotFood`] and stop the chain
//! 2. [`CachedLookupStrategy`] - cached search, first candidate, cached detail
//! 3. [`ProviderStrategy`] - remote search and detail (writes through to cache)
//!
//! When every strategy misses, the default record
//! ([`MacroSet::DEFAULT_FOOD`]) is used. Whatever the tier, the per-100g
//! record is scaled by `grams / 100`.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::cache::{CacheKey, CacheStore};
use crate::catalog::FoodCatalog;
use crate::external::NutritionProvider;
use crate::models::{FoodSource, MacroSet, ResolvedFood, SearchCandidate};
use crate::utils::title_case;

/// What a single tier concluded about a label
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TierOutcome {
    /// Per-100g macros for the label
    Found(MacroSet),
    /// The label is a known non-food class
    NotFood,
    /// This tier cannot answer; try the next one
    Miss,
}

/// Final answer for a label
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Scaled food together with the tier that produced it
    Resolved {
        /// Portion-scaled macros
        food: ResolvedFood,
        /// Tier the record came from
        source: FoodSource,
    },
    /// The label names something that is not food
    NotFood,
}

impl Resolution {
    /// The resolved food, if any
    #[must_use]
    pub fn into_food(self) -> Option<ResolvedFood> {
        match self {
            Self::Resolved { food, .. } => Some(food),
            Self::NotFood => None,
        }
    }

    /// Source tier of a resolved food
    #[must_use]
    pub const fn source(&self) -> Option<FoodSource> {
        match self {
            Self::Resolved { source, .. } => Some(*source),
            Self::NotFood => None,
        }
    }
}

/// One resolution tier
#[async_trait]
pub trait ResolutionStrategy: Send + Sync {
    /// Source tag reported for records found by this tier
    fn source(&self) -> FoodSource;

    /// Look up per-100g macros for `label`
    async fn lookup(&self, label: &str) -> TierOutcome;
}

/// Exact, case-insensitive match against the food catalog
pub struct LocalCatalogStrategy {
    catalog: Arc<FoodCatalog>,
}

impl LocalCatalogStrategy {
    /// Strategy over `catalog`
    #[must_use]
    pub const fn new(catalog: Arc<FoodCatalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ResolutionStrategy for LocalCatalogStrategy {
    fn source(&self) -> FoodSource {
        FoodSource::Local
    }

    async fn lookup(&self, label: &str) -> TierOutcome {
        match self.catalog.get(label) {
            Some(record) if record.macros.is_non_food() => TierOutcome::NotFood,
            Some(record) => TierOutcome::Found(record.macros),
            None => TierOutcome::Miss,
        }
    }
}

/// Provider data already in the cache, read without touching the network
pub struct CachedLookupStrategy {
    cache: Arc<dyn CacheStore>,
}

impl CachedLookupStrategy {
    /// Strategy reading provider entries from `cache`
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ResolutionStrategy for CachedLookupStrategy {
    fn source(&self) -> FoodSource {
        FoodSource::Cache
    }

    async fn lookup(&self, label: &str) -> TierOutcome {
        let Some(search) = self.cache.get(&CacheKey::search(label)).await.into_value() else {
            return TierOutcome::Miss;
        };
        let Some(first) = SearchCandidate::list_from_payload(&search)
            .and_then(|candidates| candidates.into_iter().next())
        else {
            return TierOutcome::Miss;
        };
        self.cache
            .get(&CacheKey::detail(&first.id))
            .await
            .into_value()
            .and_then(|detail| MacroSet::from_detail_payload(&detail))
            .map_or(TierOutcome::Miss, TierOutcome::Found)
    }
}

/// Remote provider search followed by a detail fetch of the first candidate
pub struct ProviderStrategy {
    provider: Arc<dyn NutritionProvider>,
}

impl ProviderStrategy {
    /// Strategy querying `provider`
    #[must_use]
    pub fn new(provider: Arc<dyn NutritionProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl ResolutionStrategy for ProviderStrategy {
    fn source(&self) -> FoodSource {
        FoodSource::Usda
    }

    async fn lookup(&self, label: &str) -> TierOutcome {
        let candidates = self.provider.search(label).await;
        let Some(first) = candidates.first() else {
            return TierOutcome::Miss;
        };
        self.provider
            .detail(&first.id)
            .await
            .map_or(TierOutcome::Miss, TierOutcome::Found)
    }
}

/// Ordered strategy chain with the default record as the last resort
pub struct MacroResolver {
    catalog: Arc<FoodCatalog>,
    provider: Arc<dyn NutritionProvider>,
    strategies: Vec<Box<dyn ResolutionStrategy>>,
}

impl MacroResolver {
    /// Standard chain: catalog, cache, provider
    #[must_use]
    pub fn new(
        catalog: Arc<FoodCatalog>,
        cache: Arc<dyn CacheStore>,
        provider: Arc<dyn NutritionProvider>,
    ) -> Self {
        let strategies: Vec<Box<dyn ResolutionStrategy>> = vec![
            Box::new(LocalCatalogStrategy::new(Arc::clone(&catalog))),
            Box::new(CachedLookupStrategy::new(cache)),
            Box::new(ProviderStrategy::new(Arc::clone(&provider))),
        ];
        Self::with_strategies(catalog, provider, strategies)
    }

    /// Custom chain; `provider` still backs [`Self::resolve_id`]
    #[must_use]
    pub fn with_strategies(
        catalog: Arc<FoodCatalog>,
        provider: Arc<dyn NutritionProvider>,
        strategies: Vec<Box<dyn ResolutionStrategy>>,
    ) -> Self {
        Self {
            catalog,
            provider,
            strategies,
        }
    }

    /// Catalog used by the local tier
    #[must_use]
    pub fn catalog(&self) -> &FoodCatalog {
        &self.catalog
    }

    /// Resolve `label` at `grams`
    ///
    /// Never fails: an unknown label resolves to the default record with
    /// [`FoodSource::Default`].
    pub async fn resolve(&self, label: &str, grams: u32) -> Resolution {
        let name = title_case(label);
        for strategy in &self.strategies {
            match strategy.lookup(label).await {
                TierOutcome::Found(per_100g) => {
                    let source = strategy.source();
                    debug!(label, ?source, grams, "Resolved food");
                    return Resolution::Resolved {
                        food: ResolvedFood::from_per_100g(name, grams, &per_100g),
                        source,
                    };
                }
                TierOutcome::NotFood => {
                    debug!(label, "Label is a non-food class");
                    return Resolution::NotFood;
                }
                TierOutcome::Miss => {}
            }
        }

        debug!(label, grams, "No tier resolved label, using default record");
        Resolution::Resolved {
            food: ResolvedFood::from_per_100g(name, grams, &MacroSet::DEFAULT_FOOD),
            source: FoodSource::Default,
        }
    }

    /// Resolve a catalog name or provider id without the default fallback
    ///
    /// Catalog hits are named in title case; provider hits keep the raw id as
    /// their name. Non-food catalog records fall through to the provider.
    pub async fn resolve_id(&self, id: &str, grams: u32) -> Option<(ResolvedFood, FoodSource)> {
        if let Some(record) = self.catalog.get(id).filter(|r| !r.macros.is_non_food()) {
            let food = ResolvedFood::from_per_100g(title_case(id), grams, &record.macros);
            return Some((food, FoodSource::Local));
        }
        let per_100g = self.provider.detail(id).await?;
        Some((
            ResolvedFood::from_per_100g(id.to_owned(), grams, &per_100g),
            FoodSource::Usda,
        ))
    }
}
