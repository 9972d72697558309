// ABOUTME: USDA FoodData Central API client for food search and per-100g macro retrieval
// ABOUTME: Cache-first with write-through; network and parse failures degrade to empty results

// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! USDA `FoodData` Central API Client
//!
//! Provides the remote tier of nutrition resolution:
//! - `search(query)` returns up to 10 candidates `{id, name, brand}`
//! - `detail(id)` returns the five-field macro record per 100 g
//!
//! Both consult the [`CacheStore`] first (`search_<query>`, `detail_<id>`) and
//! write successful fetches back. Without an API key the client still answers
//! from the cache but never calls the network.
//!
//! # API Reference
//! USDA `FoodData` Central API: <https://fdc.nal.usda.gov/api-guide.html>
//!
//! # Example
//! ```rust,no_run
//! use bitewise::cache::memory::InMemoryCache;
//! use bitewise::external::{NutritionProvider, UsdaClient, UsdaClientConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = UsdaClientConfig {
//!     api_key: Some("your_api_key".to_owned()),
//!     ..UsdaClientConfig::default()
//! };
//! let client = UsdaClient::new(config, Arc::new(InMemoryCache::new(100)))?;
//! let candidates = client.search("apple").await;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::cache::{CacheKey, CacheLookup, CacheStore};
use crate::constants::usda::{
    DEFAULT_BASE_URL, REQUEST_TIMEOUT_SECS, SEARCH_DATA_TYPES, SEARCH_PAGE_SIZE, SOURCE_NAME,
    UNNAMED_FOOD,
};
use crate::errors::{AppError, AppResult};
use crate::models::{MacroSet, SearchCandidate};

/// Remote food database used as the last real resolution tier
///
/// Implementations never fail: unreachable or malformed upstream data is an
/// empty search or a missing detail.
#[async_trait::async_trait]
pub trait NutritionProvider: Send + Sync {
    /// Provider name used as the source tag
    fn name(&self) -> &'static str;

    /// Ordered search candidates for `query`
    async fn search(&self, query: &str) -> Vec<SearchCandidate>;

    /// Per-100g macros for provider item `id`
    async fn detail(&self, id: &str) -> Option<MacroSet>;
}

/// USDA API client configuration
#[derive(Debug, Clone)]
pub struct UsdaClientConfig {
    /// USDA API key (free from <https://fdc.nal.usda.gov/api-key-signup.html>)
    pub api_key: Option<String>,
    /// Base URL for USDA API (default: <https://api.nal.usda.gov/fdc/v1>)
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Results requested and kept per search
    pub page_size: usize,
}

impl Default for UsdaClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            page_size: SEARCH_PAGE_SIZE,
        }
    }
}

/// One nutrient row, flattened from either USDA response shape
#[derive(Debug, Clone, PartialEq)]
pub struct FoodNutrient {
    /// Nutrient name (e.g., "Protein", "Energy")
    pub name: String,
    /// Nutrient unit (e.g., "g", "kcal", "kJ")
    pub unit_name: String,
    /// Amount per 100g
    pub amount: f64,
}

/// USDA API search response
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    foods: Vec<SearchFoodResponse>,
}

#[derive(Debug, Deserialize)]
struct SearchFoodResponse {
    #[serde(rename = "fdcId")]
    fdc_id: Option<Value>,
    description: Option<String>,
    #[serde(rename = "brandOwner")]
    brand_owner: Option<String>,
}

/// USDA API food details response
#[derive(Debug, Deserialize)]
struct FoodDetailsResponse {
    #[serde(rename = "foodNutrients", default)]
    food_nutrients: Vec<FoodNutrientResponse>,
}

/// Nutrient rows come nested (`nutrient.name`, `amount`) in full responses and
/// flat (`nutrientName`, `value`) in abridged ones
#[derive(Debug, Deserialize)]
struct FoodNutrientResponse {
    nutrient: Option<NutrientInfo>,
    amount: Option<f64>,
    #[serde(rename = "nutrientName")]
    nutrient_name: Option<String>,
    #[serde(rename = "unitName")]
    unit_name: Option<String>,
    value: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct NutrientInfo {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "unitName", default)]
    unit_name: Option<String>,
}

impl FoodNutrientResponse {
    fn into_nutrient(self) -> FoodNutrient {
        let (nested_name, nested_unit) = self
            .nutrient
            .map_or((None, None), |n| (n.name, n.unit_name));
        FoodNutrient {
            name: nested_name.or(self.nutrient_name).unwrap_or_default(),
            unit_name: nested_unit.or(self.unit_name).unwrap_or_default(),
            amount: self.amount.or(self.value).unwrap_or(0.0),
        }
    }
}

impl SearchFoodResponse {
    fn into_candidate(self) -> Option<SearchCandidate> {
        let id = match self.fdc_id? {
            Value::Number(n) => n.to_string(),
            Value::String(s) => s,
            _ => return None,
        };
        Some(SearchCandidate {
            id,
            name: self
                .description
                .unwrap_or_else(|| UNNAMED_FOOD.to_owned()),
            brand: self.brand_owner,
        })
    }
}

/// USDA `FoodData` Central API Client
pub struct UsdaClient {
    config: UsdaClientConfig,
    http_client: reqwest::Client,
    cache: Arc<dyn CacheStore>,
}

impl UsdaClient {
    /// Create a new USDA API client backed by `cache`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created
    pub fn new(config: UsdaClientConfig, cache: Arc<dyn CacheStore>) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            config,
            http_client,
            cache,
        })
    }

    /// Whether network fetches are enabled
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.config.api_key.is_some()
    }

    async fn cached_search(&self, key: &CacheKey) -> Option<Vec<SearchCandidate>> {
        match self.cache.get(key).await {
            CacheLookup::Hit(value) => {
                let candidates = SearchCandidate::list_from_payload(&value);
                if candidates.is_none() {
                    debug!(%key, "Cached search has unexpected shape, refetching");
                }
                candidates
            }
            CacheLookup::Miss(reason) => {
                debug!(%key, ?reason, "Search cache miss");
                None
            }
        }
    }

    async fn cached_detail(&self, key: &CacheKey) -> Option<MacroSet> {
        match self.cache.get(key).await {
            CacheLookup::Hit(value) => {
                let macros = MacroSet::from_detail_payload(&value);
                if macros.is_none() {
                    debug!(%key, "Cached detail has unexpected shape, refetching");
                }
                macros
            }
            CacheLookup::Miss(reason) => {
                debug!(%key, ?reason, "Detail cache miss");
                None
            }
        }
    }

    async fn write_through(&self, key: &CacheKey, value: &Value) {
        if let Err(e) = self.cache.put(key, value).await {
            warn!(%key, error = %e, "Failed to cache USDA response");
        }
    }

    /// Base URL with `segments` appended, each percent-encoded as a single segment
    fn endpoint(&self, segments: &[&str]) -> AppResult<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| AppError::config(format!("Invalid USDA base URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|()| AppError::config("USDA base URL cannot carry a path"))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() || e.is_connect() {
                AppError::external_unavailable("USDA API", e.to_string())
            } else {
                AppError::external_service("USDA API", e.to_string())
            }
        })?;

        if !response.status().is_success() {
            return Err(AppError::external_service(
                "USDA API",
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(response)
    }

    /// Query the search endpoint
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured, the request fails, or
    /// the body is not a search response
    pub async fn fetch_search(&self, query: &str) -> AppResult<Vec<SearchCandidate>> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("USDA API key not configured"))?;

        let url = self.endpoint(&["foods", "search"])?;
        let page_size = self.config.page_size.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("api_key", api_key),
            ("query", query),
            ("pageSize", &page_size),
            ("sortBy", "score"),
        ];
        params.extend(SEARCH_DATA_TYPES.iter().map(|t| ("dataType", *t)));

        let response = self.send(self.http_client.get(url).query(&params)).await?;
        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::external_service("USDA API", format!("JSON parse error: {e}"))
        })?;

        Ok(search_response
            .foods
            .into_iter()
            .filter_map(SearchFoodResponse::into_candidate)
            .take(self.config.page_size)
            .collect())
    }

    /// Query the food detail endpoint and map its nutrients
    ///
    /// # Errors
    ///
    /// Returns an error when no API key is configured, the request fails, or
    /// the body is not a detail response
    pub async fn fetch_detail(&self, id: &str) -> AppResult<MacroSet> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::config("USDA API key not configured"))?;

        let url = self.endpoint(&["food", id])?;
        let response = self
            .send(self.http_client.get(url).query(&[("api_key", api_key)]))
            .await?;
        let details: FoodDetailsResponse = response.json().await.map_err(|e| {
            AppError::external_service("USDA API", format!("JSON parse error: {e}"))
        })?;

        let nutrients: Vec<FoodNutrient> = details
            .food_nutrients
            .into_iter()
            .map(FoodNutrientResponse::into_nutrient)
            .collect();
        Ok(macros_from_nutrients(&nutrients))
    }
}

#[async_trait::async_trait]
impl NutritionProvider for UsdaClient {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let key = CacheKey::search(query);
        if let Some(cached) = self.cached_search(&key).await {
            return cached;
        }
        if !self.has_api_key() {
            return Vec::new();
        }

        match self.fetch_search(query).await {
            Ok(results) => {
                self.write_through(&key, &json!({ "results": results })).await;
                results
            }
            Err(e) => {
                warn!(query, error = %e, "USDA search failed");
                Vec::new()
            }
        }
    }

    async fn detail(&self, id: &str) -> Option<MacroSet> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        let key = CacheKey::detail(id);
        if let Some(cached) = self.cached_detail(&key).await {
            return Some(cached);
        }
        if !self.has_api_key() {
            return None;
        }

        match self.fetch_detail(id).await {
            Ok(macros) => {
                self.write_through(&key, &json!({ "macros": macros })).await;
                Some(macros)
            }
            Err(e) => {
                warn!(id, error = %e, "USDA detail lookup failed");
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MacroField {
    Calories,
    Protein,
    Carbs,
    Fat,
    Fiber,
}

/// Canonical USDA names outrank loose substring matches
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum MatchStrength {
    Loose,
    Exact,
}

/// Map a nutrient row to a macro field
///
/// Checked in order: energy, protein, carbohydrate, lipid/fat, fiber. Energy
/// rows in kJ are ignored so they never overwrite kcal.
fn classify_nutrient(name: &str, unit: &str) -> Option<(MacroField, MatchStrength)> {
    let strength = |exact: bool| {
        if exact {
            MatchStrength::Exact
        } else {
            MatchStrength::Loose
        }
    };

    if name.contains("energy") || name == "kcal" {
        if unit == "kj" {
            return None;
        }
        return Some((MacroField::Calories, strength(unit == "kcal" || name == "kcal")));
    }
    if name.contains("protein") {
        return Some((MacroField::Protein, MatchStrength::Exact));
    }
    if name.contains("carbohydrate") {
        return Some((
            MacroField::Carbs,
            strength(name.starts_with("carbohydrate, by difference")),
        ));
    }
    if name.starts_with("total lipid") {
        return Some((MacroField::Fat, MatchStrength::Exact));
    }
    if name.contains("lipid") || name.contains("fat") {
        return Some((MacroField::Fat, MatchStrength::Loose));
    }
    if name.contains("fiber") {
        return Some((
            MacroField::Fiber,
            strength(name.starts_with("fiber, total dietary")),
        ));
    }
    None
}

/// Fold a heterogeneous nutrient list into the five-field macro record
///
/// Matching is case-insensitive and substring based. When several rows map to
/// the same field, a canonical row ("Total lipid (fat)", "Energy" in kcal,
/// "Carbohydrate, by difference", "Fiber, total dietary") beats a loose one
/// such as "Fatty acids, total saturated"; among equals the first row wins.
/// Fields with no matching row are 0.
#[must_use]
pub fn macros_from_nutrients(nutrients: &[FoodNutrient]) -> MacroSet {
    let mut slots: [Option<(f64, MatchStrength)>; 5] = [None; 5];
    for nutrient in nutrients {
        let name = nutrient.name.trim().to_lowercase();
        let unit = nutrient.unit_name.trim().to_lowercase();
        let Some((field, strength)) = classify_nutrient(&name, &unit) else {
            continue;
        };
        let slot = &mut slots[field as usize];
        if slot.map_or(true, |(_, existing)| strength > existing) {
            *slot = Some((nutrient.amount, strength));
        }
    }
    let value = |field: MacroField| slots[field as usize].map_or(0.0, |(amount, _)| amount);
    MacroSet::new(
        value(MacroField::Calories),
        value(MacroField::Protein),
        value(MacroField::Carbs),
        value(MacroField::Fat),
        value(MacroField::Fiber),
    )
}
