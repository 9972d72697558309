// ABOUTME: Health check and banner route handlers for service monitoring
// ABOUTME: Reports liveness plus the cache backend's health
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Health check routes for service monitoring

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::resources::ServerResources;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create the banner and health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/", get(Self::handle_root))
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_root() -> Json<Value> {
        Json(json!({ "message": "BiteWise AI backend is running" }))
    }

    async fn handle_health(State(resources): State<Arc<ServerResources>>) -> Json<Value> {
        let cache_ok = resources.cache.health_check().await.is_ok();
        Json(json!({
            "status": if cache_ok { "healthy" } else { "degraded" },
            "cache": resources.cache.backend_name(),
            "timestamp": Utc::now().to_rfc3339()
        }))
    }
}
