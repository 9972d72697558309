// ABOUTME: Immutable food catalog built once at startup from curated records and cached provider data
// ABOUTME: Shared by Arc across requests; lookups are lock-free reads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Food Catalog
//!
//! The catalog is the local resolution tier. It starts from a curated table of
//! per-100g records (including zero-calorie entries for detector classes that
//! are not food) and is enriched once from the provider cache: every cached
//! search result whose detail is also cached becomes a record, unless a
//! curated record of the same name exists. After construction it never changes.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;
use tracing::{debug, info};

use crate::cache::{CacheKey, CacheStore};
use crate::errors::AppResult;
use crate::models::{FoodRecord, MacroSet, SearchCandidate, SearchHit};
use crate::utils::title_case;

/// Curated per-100g records
const CURATED_FOODS: &[(&str, MacroSet)] = &[
    ("apple", MacroSet::new(52.0, 0.3, 14.0, 0.2, 2.4)),
    ("banana", MacroSet::new(89.0, 1.1, 23.0, 0.3, 2.6)),
    ("orange", MacroSet::new(47.0, 0.9, 12.0, 0.1, 2.4)),
    ("sandwich", MacroSet::new(250.0, 12.0, 30.0, 10.0, 3.0)),
    ("hot dog", MacroSet::new(290.0, 10.0, 2.0, 26.0, 0.0)),
    ("pizza", MacroSet::new(266.0, 11.0, 33.0, 10.0, 2.3)),
    ("donut", MacroSet::new(452.0, 5.0, 51.0, 25.0, 2.0)),
    ("cake", MacroSet::new(257.0, 3.0, 46.0, 8.0, 1.2)),
    ("broccoli", MacroSet::new(34.0, 2.8, 7.0, 0.4, 2.6)),
    ("carrot", MacroSet::new(41.0, 0.9, 10.0, 0.2, 2.8)),
    // Detector classes that are not food
    ("person", MacroSet::new(0.0, 0.0, 0.0, 0.0, 0.0)),
    ("car", MacroSet::new(0.0, 0.0, 0.0, 0.0, 0.0)),
    // Common foods for free-text nutrition questions
    ("chicken breast", MacroSet::new(165.0, 31.0, 0.0, 3.6, 0.0)),
    ("white rice", MacroSet::new(130.0, 2.7, 28.0, 0.3, 0.4)),
    ("brown rice", MacroSet::new(112.0, 2.6, 22.0, 0.9, 1.8)),
    ("oats", MacroSet::new(389.0, 16.9, 66.3, 6.9, 10.6)),
    ("egg", MacroSet::new(155.0, 13.0, 1.1, 11.0, 0.0)),
    ("salmon", MacroSet::new(208.0, 25.4, 0.0, 12.4, 0.0)),
    ("tofu", MacroSet::new(76.0, 8.0, 1.9, 4.8, 0.3)),
];

/// Read-only table of food records keyed by lowercased name
#[derive(Debug, Clone, Default)]
pub struct FoodCatalog {
    records: BTreeMap<String, FoodRecord>,
}

impl FoodCatalog {
    /// Catalog from explicit records; later duplicates of a name are ignored
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = FoodRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert_if_absent(record);
        }
        catalog
    }

    /// The curated table only
    #[must_use]
    pub fn curated() -> Self {
        Self::from_records(
            CURATED_FOODS
                .iter()
                .map(|(name, macros)| FoodRecord::new(name, *macros)),
        )
    }

    /// Curated table enriched from every entry currently in `cache`
    ///
    /// # Errors
    ///
    /// Returns an error if the cache cannot be enumerated
    pub async fn load(cache: &dyn CacheStore) -> AppResult<Self> {
        let entries = cache.entries().await?;
        let mut catalog = Self::curated();
        let curated_count = catalog.len();
        catalog.enrich_from_cache_entries(&entries);
        info!(
            curated = curated_count,
            enriched = catalog.len() - curated_count,
            backend = cache.backend_name(),
            "Food catalog loaded"
        );
        Ok(catalog)
    }

    /// Add records for cached search results whose detail is also cached
    ///
    /// Detail payloads are read from their `macros` object (or the payload
    /// itself) and must carry all five macro fields. Existing names win.
    pub fn enrich_from_cache_entries(&mut self, entries: &[(CacheKey, Value)]) {
        let details: HashMap<&str, &Value> = entries
            .iter()
            .filter_map(|(key, value)| match key {
                CacheKey::Detail { id } => Some((id.as_str(), value)),
                CacheKey::Search { .. } => None,
            })
            .collect();

        for (key, value) in entries {
            if !matches!(key, CacheKey::Search { .. }) {
                continue;
            }
            let candidates = SearchCandidate::list_from_payload(value).unwrap_or_default();
            for candidate in candidates {
                let name = candidate.name.trim();
                if name.is_empty() {
                    continue;
                }
                let Some(macros) = details
                    .get(candidate.id.as_str())
                    .and_then(|detail| MacroSet::from_detail_payload(detail))
                else {
                    continue;
                };
                if self.insert_if_absent(FoodRecord::new(name, macros)) {
                    debug!(name, id = %candidate.id, "Catalog enriched from cache");
                }
            }
        }
    }

    fn insert_if_absent(&mut self, record: FoodRecord) -> bool {
        if self.records.contains_key(&record.name) {
            return false;
        }
        self.records.insert(record.name.clone(), record);
        true
    }

    /// Case-insensitive exact lookup
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FoodRecord> {
        self.records.get(&name.trim().to_lowercase())
    }

    /// Whether `name` is a catalog key
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Keys that free-text queries and search may match: every edible record
    pub fn queryable_keys(&self) -> impl Iterator<Item = &str> {
        self.records
            .values()
            .filter(|record| !record.macros.is_non_food())
            .map(|record| record.name.as_str())
    }

    /// Local search hits: queryable keys containing the lowercased query, in key order
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.queryable_keys()
            .filter(|key| key.contains(&needle))
            .map(|key| SearchHit::local(key, title_case(key)))
            .collect()
    }

    /// Number of records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the catalog has no records
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_curated_lookup_is_case_insensitive() {
        let catalog = FoodCatalog::curated();
        let record = catalog.get("  Chicken Breast ").unwrap();
        assert!((record.macros.calories - 165.0).abs() < f64::EPSILON);
        assert!(catalog.get("default_food").is_none());
    }

    #[test]
    fn test_queryable_keys_exclude_non_food() {
        let catalog = FoodCatalog::curated();
        let keys: Vec<&str> = catalog.queryable_keys().collect();
        assert!(!keys.contains(&"person"));
        assert!(!keys.contains(&"car"));
        assert!(keys.contains(&"pizza"));
    }

    #[test]
    fn test_local_search() {
        let catalog = FoodCatalog::curated();
        let hits = catalog.search("Rice");
        let names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["Brown Rice", "White Rice"]);
        assert!(catalog.search("   ").is_empty());
        assert!(catalog.search("car").iter().all(|h| h.id != "car"));
    }
}
