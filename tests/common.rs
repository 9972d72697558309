// ABOUTME: Shared test utilities for integration tests
// ABOUTME: Provides quiet logging, a scripted nutrition provider, a scripted LLM, and resource builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]
//! Shared test utilities for `bitewise`

use std::collections::HashMap;
use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use bitewise::cache::memory::InMemoryCache;
use bitewise::cache::CacheStore;
use bitewise::catalog::FoodCatalog;
use bitewise::errors::AppError;
use bitewise::external::NutritionProvider;
use bitewise::llm::{ChatRequest, ChatResponse, LlmProvider};
use bitewise::models::{MacroSet, SearchCandidate};
use bitewise::resources::ServerResources;
use tracing::Level;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => Level::TRACE,
            Ok("DEBUG") => Level::DEBUG,
            Ok("INFO") => Level::INFO,
            _ => Level::WARN,
        };
        let _ = tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .try_init();
    });
}

/// In-process provider answering from fixed tables and counting calls
#[derive(Default)]
pub struct ScriptedProvider {
    searches: HashMap<String, Vec<SearchCandidate>>,
    details: HashMap<String, MacroSet>,
    search_calls: AtomicUsize,
    detail_calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `search(query)` (case-insensitive) with one candidate and its detail
    pub fn with_food(mut self, query: &str, id: &str, name: &str, macros: MacroSet) -> Self {
        self.searches
            .entry(query.to_lowercase())
            .or_default()
            .push(SearchCandidate {
                id: id.to_owned(),
                name: name.to_owned(),
                brand: None,
            });
        self.details.insert(id.to_owned(), macros);
        self
    }

    /// Answer `detail(id)` without a matching search
    pub fn with_detail(mut self, id: &str, macros: MacroSet) -> Self {
        self.details.insert(id.to_owned(), macros);
        self
    }

    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub fn detail_calls(&self) -> usize {
        self.detail_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NutritionProvider for ScriptedProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn search(&self, query: &str) -> Vec<SearchCandidate> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.searches
            .get(&query.trim().to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    async fn detail(&self, id: &str) -> Option<MacroSet> {
        self.detail_calls.fetch_add(1, Ordering::SeqCst);
        self.details.get(id).copied()
    }
}

/// LLM stub returning a fixed answer (or an error) and recording requests
pub struct ScriptedLlm {
    answer: Result<String, String>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlm {
    pub fn answering(content: &str) -> Self {
        Self {
            answer: Ok(content.to_owned()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_owned()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        match &self.answer {
            Ok(content) => Ok(ChatResponse {
                content: content.clone(),
                model: "scripted-model".to_owned(),
            }),
            Err(message) => Err(AppError::external_service("LLM", message.clone())),
        }
    }
}

/// Resources over the curated catalog, an in-memory cache, and `provider`
pub fn test_resources(
    provider: Arc<ScriptedProvider>,
    llm: Option<Arc<dyn LlmProvider>>,
) -> Arc<ServerResources> {
    init_test_logging();
    let cache: Arc<dyn CacheStore> = Arc::new(InMemoryCache::new(100));
    Arc::new(ServerResources::from_parts(
        cache,
        Arc::new(FoodCatalog::curated()),
        provider,
        llm,
        0.3,
    ))
}
