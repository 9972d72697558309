// ABOUTME: Filesystem cache backend storing one JSON document per key
// ABOUTME: Writes go to a temp file and are renamed into place so readers never see half a file
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use super::{CacheKey, CacheLookup, CacheStore, MissReason};
use crate::errors::{AppError, AppResult};

/// Distinguishes temp files of concurrent writers within one process
static WRITE_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Directory-backed cache, `<dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct FileCache {
    directory: PathBuf,
}

impl FileCache {
    /// Open (and create if needed) a cache directory
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub async fn new(directory: impl Into<PathBuf>) -> AppResult<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).await.map_err(|e| {
            AppError::storage(format!(
                "Failed to create cache directory {}: {e}",
                directory.display()
            ))
        })?;
        Ok(Self { directory })
    }

    /// Cache directory
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.directory.join(key.file_name())
    }

    fn temp_path_for(&self, key: &CacheKey) -> PathBuf {
        let sequence = WRITE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        self.directory
            .join(format!(".{key}.{}.{sequence}.tmp", process::id()))
    }
}

#[async_trait::async_trait]
impl CacheStore for FileCache {
    async fn get(&self, key: &CacheKey) -> CacheLookup {
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
                Ok(value) => CacheLookup::Hit(value),
                Err(e) => {
                    debug!(%key, error = %e, "Corrupt cache entry treated as miss");
                    CacheLookup::Miss(MissReason::Corrupt)
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => CacheLookup::Miss(MissReason::Absent),
            Err(e) => {
                warn!(%key, error = %e, "Unreadable cache entry treated as miss");
                CacheLookup::Miss(MissReason::Unavailable)
            }
        }
    }

    async fn put(&self, key: &CacheKey, value: &Value) -> AppResult<()> {
        let bytes = serde_json::to_vec(value)?;
        let temp_path = self.temp_path_for(key);
        fs::write(&temp_path, &bytes).await?;
        if let Err(e) = fs::rename(&temp_path, self.path_for(key)).await {
            // Leave no stray temp file behind; the rename error is what matters
            if let Err(cleanup) = fs::remove_file(&temp_path).await {
                debug!(error = %cleanup, "Temp cache file cleanup failed");
            }
            return Err(e.into());
        }
        debug!(%key, bytes = bytes.len(), "Cache entry written");
        Ok(())
    }

    async fn entries(&self) -> AppResult<Vec<(CacheKey, Value)>> {
        let mut dir = fs::read_dir(&self.directory).await?;
        let mut entries = Vec::new();
        while let Some(entry) = dir.next_entry().await? {
            let file_name = entry.file_name();
            let Some(key) = file_name.to_str().and_then(CacheKey::from_file_name) else {
                continue;
            };
            if let CacheLookup::Hit(value) = self.get(&key).await {
                entries.push((key, value));
            }
        }
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    async fn health_check(&self) -> AppResult<()> {
        let metadata = fs::metadata(&self.directory).await?;
        if metadata.is_dir() {
            Ok(())
        } else {
            Err(AppError::storage(format!(
                "Cache path {} is not a directory",
                self.directory.display()
            )))
        }
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
