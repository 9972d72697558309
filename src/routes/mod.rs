// ABOUTME: Route module organization for the BiteWise HTTP endpoints
// ABOUTME: Merges per-area routers and applies CORS and request tracing layers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! HTTP routes
//!
//! Each area has a route struct whose `routes` function returns a router with
//! its state attached; [`build_router`] merges them.

/// Nutrition assistant chat route
pub mod chat;
/// Food search and macro lookup routes
pub mod foods;
/// Banner and health check routes
pub mod health;
/// Meal analysis route
pub mod meals;

pub use chat::ChatRoutes;
pub use foods::FoodRoutes;
pub use health::HealthRoutes;
pub use meals::MealRoutes;

use std::sync::Arc;

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::resources::ServerResources;

/// Complete application router
pub fn build_router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(HealthRoutes::routes(Arc::clone(&resources)))
        .merge(FoodRoutes::routes(Arc::clone(&resources)))
        .merge(MealRoutes::routes(Arc::clone(&resources)))
        .merge(ChatRoutes::routes(resources))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
