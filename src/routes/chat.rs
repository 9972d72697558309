// ABOUTME: Chat route handler for the nutrition assistant
// ABOUTME: Always answers with a reply; upstream LLM problems are handled by the assistant
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};

use crate::chat::{ChatReply, ChatTurn};
use crate::resources::ServerResources;

/// Chat routes implementation
pub struct ChatRoutes;

impl ChatRoutes {
    /// Create the chat route
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/chat", post(Self::handle_chat))
            .with_state(resources)
    }

    async fn handle_chat(
        State(resources): State<Arc<ServerResources>>,
        Json(turn): Json<ChatTurn>,
    ) -> Json<ChatReply> {
        Json(resources.assistant.reply(&turn).await)
    }
}
