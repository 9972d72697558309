// ABOUTME: In-memory cache backend with LRU eviction
// ABOUTME: Used by tests and deployments that do not want cache files on disk
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{CacheKey, CacheLookup, CacheStore, MissReason};
use crate::errors::AppResult;

/// In-memory cache with LRU eviction
///
/// `LruCache::get` updates recency, so reads take the write lock.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Arc<RwLock<LruCache<CacheKey, Value>>>,
}

impl InMemoryCache {
    /// Capacity used when zero entries are requested
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create a cache holding at most `max_entries` values
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored values
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    /// Whether nothing is stored
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

#[async_trait::async_trait]
impl CacheStore for InMemoryCache {
    async fn get(&self, key: &CacheKey) -> CacheLookup {
        let mut store = self.store.write().await;
        store
            .get(key)
            .cloned()
            .map_or(CacheLookup::Miss(MissReason::Absent), CacheLookup::Hit)
    }

    async fn put(&self, key: &CacheKey, value: &Value) -> AppResult<()> {
        self.store.write().await.push(key.clone(), value.clone());
        Ok(())
    }

    async fn entries(&self) -> AppResult<Vec<(CacheKey, Value)>> {
        let store = self.store.read().await;
        let mut entries: Vec<(CacheKey, Value)> = store
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        drop(store);
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn health_check(&self) -> AppResult<()> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
