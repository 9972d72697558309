// ABOUTME: Meal analysis route handler for object-detector output
// ABOUTME: Malformed or invalid batches still answer with the default meal and an error field
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::warn;

use crate::detection::{DetectionBatch, MealAnalysis};
use crate::resources::ServerResources;

/// Meal routes implementation
pub struct MealRoutes;

impl MealRoutes {
    /// Create the meal analysis route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/predict-calories", post(Self::handle_predict))
            .with_state(resources)
    }

    async fn handle_predict(
        State(resources): State<Arc<ServerResources>>,
        body: Result<Json<DetectionBatch>, JsonRejection>,
    ) -> Json<MealAnalysis> {
        match body {
            Ok(Json(batch)) => Json(resources.analyzer.analyze(&batch).await),
            Err(rejection) => {
                warn!(error = %rejection, "Unreadable detection batch");
                Json(MealAnalysis::fallback())
            }
        }
    }
}
