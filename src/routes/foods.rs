// ABOUTME: Food search and macro lookup route handlers
// ABOUTME: Merged local and USDA search results; per-id macros scaled to a requested weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::constants::resolution::{ENDPOINT_MAX_GRAMS, ENDPOINT_MIN_GRAMS};
use crate::errors::AppError;
use crate::merger::ResultMerger;
use crate::models::{FoodSource, NutritionTotals, SearchHit};
use crate::resources::ServerResources;

/// Query parameters for `/foods/search`
#[derive(Debug, Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Query parameters for `/foods/macros`
#[derive(Debug, Deserialize)]
struct MacrosQuery {
    #[serde(default)]
    id: Option<String>,
    grams: Option<i64>,
}

impl MacrosQuery {
    fn clamped_grams(&self) -> u32 {
        let grams = self
            .grams
            .unwrap_or(100)
            .clamp(i64::from(ENDPOINT_MIN_GRAMS), i64::from(ENDPOINT_MAX_GRAMS));
        u32::try_from(grams).unwrap_or(ENDPOINT_MIN_GRAMS)
    }
}

/// Search response
#[derive(Debug, Serialize)]
pub struct SearchResponse {
    /// Merged hits
    pub results: Vec<SearchHit>,
}

/// Macro lookup response
#[derive(Debug, Serialize)]
pub struct MacrosResponse {
    /// Requested id
    pub id: String,
    /// Display name
    pub name: String,
    /// Weight the macros are scaled to
    pub grams: u32,
    /// Scaled macros
    pub macros: NutritionTotals,
    /// `local` or `usda`
    pub source: FoodSource,
}

/// Food routes implementation
pub struct FoodRoutes;

impl FoodRoutes {
    /// Create the food search and macro routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/foods/search", get(Self::handle_search))
            .route("/foods/macros", get(Self::handle_macros))
            .with_state(resources)
    }

    async fn handle_search(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<SearchQuery>,
    ) -> Json<SearchResponse> {
        let merger = ResultMerger::new(&resources.catalog, resources.provider.as_ref());
        Json(SearchResponse {
            results: merger.search(&params.q).await,
        })
    }

    async fn handle_macros(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<MacrosQuery>,
    ) -> Result<Json<MacrosResponse>, AppError> {
        let grams = params.clamped_grams();
        let id = params
            .id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::missing_field("id"))?;
        let (food, source) = resources
            .resolver
            .resolve_id(&id, grams)
            .await
            .ok_or_else(|| AppError::not_found("Food item"))?;

        Ok(Json(MacrosResponse {
            macros: food.nutrition(),
            id,
            name: food.name,
            grams,
            source,
        }))
    }
}
