// ABOUTME: Cache abstraction for provider responses with pluggable backends (filesystem, in-memory)
// ABOUTME: Lookups return a typed hit/miss so corruption and I/O failures read as misses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Cache factory for creating cache stores from configuration
pub mod factory;
/// One-file-per-key filesystem cache
pub mod file;
/// In-memory LRU cache
pub mod memory;

use std::fmt;
use std::path::PathBuf;

use serde_json::Value;

use crate::constants::cache::{DEFAULT_CACHE_DIR, DEFAULT_CACHE_MAX_ENTRIES};
use crate::errors::AppResult;

/// Key/value store for provider responses
///
/// Backends never surface read failures: a missing, unreadable, or malformed
/// entry is a [`CacheLookup::Miss`]. Writes are whole-value overwrites, so
/// concurrent writers of the same key can only cost a redundant refetch.
///
/// # Examples
///
/// ```rust,no_run
/// use bitewise::cache::{CacheKey, CacheStore};
/// use bitewise::cache::memory::InMemoryCache;
/// use serde_json::json;
/// # async fn example() -> bitewise::errors::AppResult<()> {
/// let cache = InMemoryCache::new(100);
/// let key = CacheKey::detail("171477");
/// cache.put(&key, &json!({"macros": {"calories": 165}})).await?;
/// assert!(cache.get(&key).await.is_hit());
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a key
    async fn get(&self, key: &CacheKey) -> CacheLookup;

    /// Store a value, replacing any previous value
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be serialized or persisted
    async fn put(&self, key: &CacheKey, value: &Value) -> AppResult<()>;

    /// Every readable entry, sorted by key; unreadable entries are skipped
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be enumerated at all
    async fn entries(&self) -> AppResult<Vec<(CacheKey, Value)>>;

    /// Verify the backend is usable
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unavailable
    async fn health_check(&self) -> AppResult<()>;

    /// Backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Cache key derived from a search query or a provider ID
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheKey {
    /// Provider search results for a normalized query
    Search {
        /// Normalized query text
        query: String,
    },
    /// Provider macro detail for one item
    Detail {
        /// Provider item ID
        id: String,
    },
}

impl CacheKey {
    /// Key for search results of `query` (normalized)
    #[must_use]
    pub fn search(query: &str) -> Self {
        Self::Search {
            query: normalize_query(query),
        }
    }

    /// Key for the detail record of provider item `id`
    #[must_use]
    pub fn detail(id: &str) -> Self {
        Self::Detail {
            id: sanitize_component(id.trim()),
        }
    }

    /// File name used by the filesystem backend
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{self}.json")
    }

    /// Recover a key from a cache file name; `None` for unrelated files
    #[must_use]
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".json")?;
        if let Some(query) = stem.strip_prefix("search_") {
            return Some(Self::Search {
                query: query.to_owned(),
            });
        }
        stem.strip_prefix("detail_").map(|id| Self::Detail {
            id: id.to_owned(),
        })
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Search { query } => write!(f, "search_{query}"),
            Self::Detail { id } => write!(f, "detail_{id}"),
        }
    }
}

/// Lowercase, trim, and join whitespace runs with `_`
#[must_use]
pub fn normalize_query(query: &str) -> String {
    let lowered = query.to_lowercase();
    let joined = lowered.split_whitespace().collect::<Vec<_>>().join("_");
    sanitize_component(&joined)
}

/// Keys must stay a single path component
fn sanitize_component(raw: &str) -> String {
    raw.chars()
        .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
        .collect()
}

/// Why a lookup missed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissReason {
    /// Nothing stored under the key
    Absent,
    /// Stored bytes are not valid JSON
    Corrupt,
    /// Backend could not be read
    Unavailable,
}

/// Outcome of a cache lookup
#[derive(Debug, Clone, PartialEq)]
pub enum CacheLookup {
    /// Stored value
    Hit(Value),
    /// No usable value
    Miss(MissReason),
}

impl CacheLookup {
    /// Whether the lookup produced a value
    #[must_use]
    pub const fn is_hit(&self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// The stored value, if any
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        match self {
            Self::Hit(value) => Some(value),
            Self::Miss(_) => None,
        }
    }
}

/// Which backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    /// One JSON file per key under a directory
    File,
    /// Bounded in-process LRU (tests, ephemeral deployments)
    Memory,
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Selected backend
    pub backend: CacheBackend,
    /// Directory for the filesystem backend
    pub directory: PathBuf,
    /// Capacity of the in-memory backend
    pub max_entries: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::File,
            directory: PathBuf::from(DEFAULT_CACHE_DIR),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
        }
    }
}
