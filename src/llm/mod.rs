// ABOUTME: LLM chat-completion abstraction used by the nutrition assistant
// ABOUTME: Defines message types and the LlmProvider trait implemented by the OpenAI-compatible client
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # LLM Provider
//!
//! Minimal chat-completion interface. The assistant builds a [`ChatRequest`]
//! and any [`LlmProvider`] turns it into a [`ChatResponse`]; failures are
//! [`AppError`]s so callers can decide whether to degrade.

mod openai_compatible;

pub use openai_compatible::{OpenAiCompatibleConfig, OpenAiCompatibleProvider};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Author of a prompt message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Assistant persona and user context
    System,
    /// The user's chat text
    User,
}

impl MessageRole {
    /// Wire name in `chat/completions` payloads
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
        }
    }
}

/// One prompt message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who wrote it
    pub role: MessageRole,
    /// Message text
    pub content: String,
}

impl ChatMessage {
    /// Message with an explicit role
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// System-role message
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// User-role message
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }
}

/// Prompt sent to an [`LlmProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// System prompt followed by the user message
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; the provider default when absent
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// Request using the provider's model and temperature
    #[must_use]
    pub const fn new(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages,
            temperature: None,
        }
    }

    /// Override the sampling temperature
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }
}

/// Completion returned by an [`LlmProvider`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatResponse {
    /// Assistant text, possibly empty
    pub content: String,
    /// Model that answered
    pub model: String,
}

/// Chat-completion backend
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider identifier for logs
    fn name(&self) -> &'static str;

    /// Complete `request`
    ///
    /// # Errors
    ///
    /// Returns an error when the upstream call fails or its body cannot be read
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError>;
}
