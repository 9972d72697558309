// ABOUTME: Cache factory for configuration-based backend selection
// ABOUTME: Wraps the concrete backends behind one cloneable Cache type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde_json::Value;

use super::file::FileCache;
use super::memory::InMemoryCache;
use super::{CacheBackend, CacheConfig, CacheKey, CacheLookup, CacheStore};
use crate::errors::AppResult;

/// Unified cache interface over the configured backend
#[derive(Clone)]
pub enum Cache {
    /// Filesystem backend
    File(FileCache),
    /// In-memory backend
    Memory(InMemoryCache),
}

impl Cache {
    /// Create a cache instance based on configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the filesystem backend cannot create its directory
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        match config.backend {
            CacheBackend::File => {
                tracing::info!(
                    "Initializing file cache at {}",
                    config.directory.display()
                );
                Ok(Self::File(FileCache::new(&config.directory).await?))
            }
            CacheBackend::Memory => {
                tracing::info!(
                    "Initializing in-memory cache (max entries: {})",
                    config.max_entries
                );
                Ok(Self::Memory(InMemoryCache::new(config.max_entries)))
            }
        }
    }

    fn backend(&self) -> &dyn CacheStore {
        match self {
            Self::File(cache) => cache,
            Self::Memory(cache) => cache,
        }
    }
}

#[async_trait::async_trait]
impl CacheStore for Cache {
    async fn get(&self, key: &CacheKey) -> CacheLookup {
        self.backend().get(key).await
    }

    async fn put(&self, key: &CacheKey, value: &Value) -> AppResult<()> {
        self.backend().put(key, value).await
    }

    async fn entries(&self) -> AppResult<Vec<(CacheKey, Value)>> {
        self.backend().entries().await
    }

    async fn health_check(&self) -> AppResult<()> {
        self.backend().health_check().await
    }

    fn backend_name(&self) -> &'static str {
        self.backend().backend_name()
    }
}
