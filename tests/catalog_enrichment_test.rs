// ABOUTME: Integration tests for building the food catalog from a populated provider cache
// ABOUTME: Cached search plus detail pairs become local records without overriding curated foods
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use bitewise::cache::file::FileCache;
use bitewise::cache::{CacheKey, CacheStore};
use bitewise::catalog::FoodCatalog;
use bitewise::models::{FoodSource, MacroSet};
use bitewise::resolver::MacroResolver;
use common::ScriptedProvider;
use serde_json::json;
use tempfile::TempDir;

const TEMPEH: MacroSet = MacroSet::new(192.0, 20.3, 7.6, 10.8, 0.0);

async fn seeded_cache(dir: &TempDir) -> Result<FileCache> {
    let cache = FileCache::new(dir.path()).await?;
    cache
        .put(
            &CacheKey::search("tempeh"),
            &json!({"results": [
                {"id": "172467", "name": "Tempeh", "brand": null},
                {"id": "999", "name": "Tempeh bacon"}
            ]}),
        )
        .await?;
    cache
        .put(&CacheKey::detail("172467"), &json!({"macros": TEMPEH}))
        .await?;
    Ok(cache)
}

#[tokio::test]
async fn test_cached_pairs_become_local_records() -> Result<()> {
    common::init_test_logging();
    let dir = TempDir::new()?;
    let cache = seeded_cache(&dir).await?;

    let catalog = FoodCatalog::load(&cache).await?;

    assert_eq!(catalog.len(), FoodCatalog::curated().len() + 1);
    assert_eq!(catalog.get("TEMPEH").unwrap().macros, TEMPEH);
    // Search result without a cached detail is not a record
    assert!(!catalog.contains("tempeh bacon"));
    Ok(())
}

#[tokio::test]
async fn test_curated_records_are_not_overridden() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = FileCache::new(dir.path()).await?;
    cache
        .put(
            &CacheKey::search("banana"),
            &json!({"results": [{"id": "1", "name": "Banana"}]}),
        )
        .await?;
    cache
        .put(
            &CacheKey::detail("1"),
            &json!({"macros": {"calories": 1.0, "protein": 1.0, "carbs": 1.0, "fat": 1.0, "fiber": 1.0}}),
        )
        .await?;

    let catalog = FoodCatalog::load(&cache).await?;

    assert!((catalog.get("banana").unwrap().macros.calories - 89.0).abs() < f64::EPSILON);
    assert_eq!(catalog.len(), FoodCatalog::curated().len());
    Ok(())
}

#[tokio::test]
async fn test_incomplete_detail_is_skipped() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = FileCache::new(dir.path()).await?;
    cache
        .put(
            &CacheKey::search("seitan"),
            &json!({"results": [{"id": "5", "name": "Seitan"}]}),
        )
        .await?;
    cache
        .put(&CacheKey::detail("5"), &json!({"macros": {"calories": 370.0}}))
        .await?;
    fs::write(dir.path().join("search_broken.json"), b"[[[")?;

    let catalog = FoodCatalog::load(&cache).await?;

    assert!(!catalog.contains("seitan"));
    assert_eq!(catalog.len(), FoodCatalog::curated().len());
    Ok(())
}

#[tokio::test]
async fn test_enriched_record_resolves_locally_after_restart() -> Result<()> {
    let dir = TempDir::new()?;
    seeded_cache(&dir).await?;

    // A fresh handle over the same directory simulates a restart
    let cache = Arc::new(FileCache::new(dir.path()).await?);
    let catalog = Arc::new(FoodCatalog::load(cache.as_ref()).await?);
    let provider = Arc::new(ScriptedProvider::new());
    let resolver = MacroResolver::new(catalog, cache, Arc::<ScriptedProvider>::clone(&provider));

    let resolution = resolver.resolve("Tempeh", 200).await;

    assert_eq!(resolution.source(), Some(FoodSource::Local));
    assert_eq!(resolution.into_food().unwrap().calories, 384);
    assert_eq!(provider.search_calls(), 0);
    Ok(())
}
