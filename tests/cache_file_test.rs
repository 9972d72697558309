// ABOUTME: Integration tests for the filesystem cache backend and the cache factory
// ABOUTME: Covers round-trips, corrupt entries, key sanitization, enumeration order, and overwrites
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use bitewise::cache::factory::Cache;
use bitewise::cache::file::FileCache;
use bitewise::cache::{CacheBackend, CacheConfig, CacheKey, CacheLookup, CacheStore, MissReason};
use serde_json::json;
use tempfile::TempDir;

#[tokio::test]
async fn test_round_trip_reproduces_payload() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = FileCache::new(dir.path()).await?;
    let key = CacheKey::search("Greek Yogurt");
    let payload = json!({"results": [{"id": "123", "name": "Greek yogurt, plain", "brand": null}]});

    cache.put(&key, &payload).await?;

    assert!(dir.path().join("search_greek_yogurt.json").exists());
    assert_eq!(cache.get(&key).await, CacheLookup::Hit(payload));
    Ok(())
}

#[tokio::test]
async fn test_missing_and_corrupt_entries_are_typed_misses() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = FileCache::new(dir.path()).await?;

    assert_eq!(
        cache.get(&CacheKey::detail("1")).await,
        CacheLookup::Miss(MissReason::Absent)
    );

    fs::write(dir.path().join("detail_2.json"), b"{not json")?;
    assert_eq!(
        cache.get(&CacheKey::detail("2")).await,
        CacheLookup::Miss(MissReason::Corrupt)
    );

    // The next successful write replaces the corrupt file
    let fixed = json!({"macros": {"calories": 1.0, "protein": 0.0, "carbs": 0.0, "fat": 0.0, "fiber": 0.0}});
    cache.put(&CacheKey::detail("2"), &fixed).await?;
    assert_eq!(cache.get(&CacheKey::detail("2")).await, CacheLookup::Hit(fixed));
    Ok(())
}

#[tokio::test]
async fn test_path_separators_stay_inside_directory() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = FileCache::new(dir.path()).await?;
    let key = CacheKey::search("../etc/passwd");

    cache.put(&key, &json!({"results": []})).await?;

    let names: Vec<String> = fs::read_dir(dir.path())?
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].starts_with("search_"));
    assert!(!names[0].contains('/'));
    Ok(())
}

#[tokio::test]
async fn test_entries_sorted_and_skip_foreign_files() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = FileCache::new(dir.path()).await?;
    cache.put(&CacheKey::search("zucchini"), &json!({"results": []})).await?;
    cache.put(&CacheKey::detail("7"), &json!({"macros": {}})).await?;
    cache.put(&CacheKey::search("apple"), &json!({"results": []})).await?;
    fs::write(dir.path().join("notes.txt"), b"ignore me")?;
    fs::write(dir.path().join("search_broken.json"), b"[")?;

    let keys: Vec<String> = cache
        .entries()
        .await?
        .into_iter()
        .map(|(key, _)| key.to_string())
        .collect();

    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&"search_apple".to_owned()));
    assert!(keys.contains(&"detail_7".to_owned()));
    assert!(!keys.iter().any(|k| k.contains("broken")));
    assert_eq!(keys, sorted_by_key(&keys));
    Ok(())
}

fn sorted_by_key(keys: &[String]) -> Vec<String> {
    let mut parsed: Vec<CacheKey> = keys
        .iter()
        .map(|k| CacheKey::from_file_name(&format!("{k}.json")).unwrap())
        .collect();
    parsed.sort();
    parsed.into_iter().map(|k| k.to_string()).collect()
}

#[tokio::test]
async fn test_concurrent_writes_leave_a_complete_entry() -> Result<()> {
    let dir = TempDir::new()?;
    let cache = Arc::new(FileCache::new(dir.path()).await?);
    let key = CacheKey::detail("42");

    let mut handles = Vec::new();
    for i in 0..8 {
        let cache = Arc::clone(&cache);
        let key = key.clone();
        handles.push(tokio::spawn(async move {
            cache.put(&key, &json!({"writer": i})).await
        }));
    }
    for handle in handles {
        handle.await??;
    }

    let value = cache.get(&key).await.into_value().unwrap();
    assert!(value["writer"].as_i64().is_some());
    let leftovers = fs::read_dir(dir.path())?
        .filter(|e| e.as_ref().unwrap().file_name().to_string_lossy().ends_with(".tmp"))
        .count();
    assert_eq!(leftovers, 0);
    Ok(())
}

#[tokio::test]
async fn test_factory_selects_backend() -> Result<()> {
    let dir = TempDir::new()?;
    let file = Cache::new(&CacheConfig {
        backend: CacheBackend::File,
        directory: dir.path().join("nested"),
        max_entries: 10,
    })
    .await?;
    assert_eq!(file.backend_name(), "file");
    file.health_check().await?;

    let memory = Cache::new(&CacheConfig {
        backend: CacheBackend::Memory,
        ..CacheConfig::default()
    })
    .await?;
    assert_eq!(memory.backend_name(), "memory");
    memory.put(&CacheKey::detail("1"), &json!({"a": 1})).await?;
    assert!(memory.get(&CacheKey::detail("1")).await.is_hit());
    Ok(())
}
