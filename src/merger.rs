// ABOUTME: Merges local catalog hits and remote provider candidates into one search result list
// ABOUTME: Local first, deduplicated by lowercased name, capped at a fixed length
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::HashSet;

use crate::catalog::FoodCatalog;
use crate::constants::search::MAX_MERGED_RESULTS;
use crate::external::NutritionProvider;
use crate::models::SearchHit;

/// Concatenate local then remote hits, drop later duplicates by lowercased
/// name, and keep at most [`MAX_MERGED_RESULTS`]
#[must_use]
pub fn merge_results(local: Vec<SearchHit>, remote: Vec<SearchHit>) -> Vec<SearchHit> {
    let mut seen = HashSet::new();
    local
        .into_iter()
        .chain(remote)
        .filter(|hit| seen.insert(hit.name.to_lowercase()))
        .take(MAX_MERGED_RESULTS)
        .collect()
}

/// Catalog and provider search behind a single merged result
pub struct ResultMerger<'a> {
    catalog: &'a FoodCatalog,
    provider: &'a dyn NutritionProvider,
}

impl<'a> ResultMerger<'a> {
    /// Merger over a catalog and a provider
    #[must_use]
    pub fn new(catalog: &'a FoodCatalog, provider: &'a dyn NutritionProvider) -> Self {
        Self { catalog, provider }
    }

    /// Merged hits for `query`; a blank query has no results
    pub async fn search(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let local = self.catalog.search(query);
        let remote = self
            .provider
            .search(query)
            .await
            .into_iter()
            .map(SearchHit::remote)
            .collect();
        merge_results(local, remote)
    }
}
