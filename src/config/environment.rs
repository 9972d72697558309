// ABOUTME: Environment-based server configuration: network, cache backend, USDA client, LLM, detection
// ABOUTME: Parses and validates every variable once at startup; invalid values are configuration errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration
//!
//! | Variable | Default |
//! |---|---|
//! | `HOST` | `0.0.0.0` |
//! | `HTTP_PORT` | `8000` |
//! | `CACHE_BACKEND` | `file` (`file` or `memory`) |
//! | `USDA_CACHE_DIR` | `usda_cache` |
//! | `CACHE_MAX_ENTRIES` | `1000` |
//! | `USDA_API_KEY` | unset (cache-only lookups) |
//! | `USDA_BASE_URL` | `https://api.nal.usda.gov/fdc/v1` |
//! | `USDA_TIMEOUT_SECS` | `12` |
//! | `OPENAI_API_KEY`, `GROQ_API_KEY`, `DEEPSEEK_API_KEY` | unset (rule-based chat) |
//! | `OPENAI_BASE_URL` | `https://api.openai.com/v1` |
//! | `OPENAI_MODEL` | `gpt-4o-mini` |
//! | `LLM_TIMEOUT_SECS` | `20` |
//! | `DETECTION_MIN_CONFIDENCE` | `0.3` |

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};

use crate::cache::{CacheBackend, CacheConfig};
use crate::constants::{cache, detection, llm, usda};
use crate::external::UsdaClientConfig;
use crate::llm::OpenAiCompatibleConfig;

/// Default bind address
const DEFAULT_HOST: &str = "0.0.0.0";

/// Default HTTP port
const DEFAULT_HTTP_PORT: u16 = 8000;

/// Keys checked in order; the first non-empty one enables the LLM
const LLM_API_KEY_VARS: [&str; 3] = ["OPENAI_API_KEY", "GROQ_API_KEY", "DEEPSEEK_API_KEY"];

/// USDA `FoodData` Central client settings
#[derive(Debug, Clone)]
pub struct UsdaSettings {
    /// API key; lookups are cache-only without it
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl UsdaSettings {
    /// Client configuration for these settings
    #[must_use]
    pub fn client_config(&self) -> UsdaClientConfig {
        UsdaClientConfig {
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            ..UsdaClientConfig::default()
        }
    }
}

/// OpenAI-compatible chat completion settings
#[derive(Debug, Clone)]
pub struct LlmSettings {
    /// Bearer token
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Model name
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LlmSettings {
    /// Provider configuration for these settings
    #[must_use]
    pub fn provider_config(&self) -> OpenAiCompatibleConfig {
        OpenAiCompatibleConfig {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            default_model: self.model.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Complete server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// HTTP port
    pub http_port: u16,
    /// Provider response cache
    pub cache: CacheConfig,
    /// USDA client
    pub usda: UsdaSettings,
    /// Chat completion; `None` keeps chat rule-based
    pub llm: Option<LlmSettings>,
    /// Detections below this confidence are ignored
    pub detection_min_confidence: f64,
}

impl ServerConfig {
    /// Load `.env` if present, then read the environment
    ///
    /// # Errors
    ///
    /// Returns an error if any variable has an invalid value
    pub fn load() -> Result<Self> {
        if let Err(e) = dotenvy::dotenv() {
            warn!("No .env file found or failed to load: {}", e);
        }
        Self::from_env()
    }

    /// Load configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if any variable has an invalid value
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let detection_min_confidence: f64 = env_var_or(
            "DETECTION_MIN_CONFIDENCE",
            &detection::DEFAULT_MIN_CONFIDENCE.to_string(),
        )
        .parse()
        .context("Invalid DETECTION_MIN_CONFIDENCE value")?;
        if !(0.0..=1.0).contains(&detection_min_confidence) {
            bail!("DETECTION_MIN_CONFIDENCE must be between 0 and 1, got {detection_min_confidence}");
        }

        Ok(Self {
            host: env_var_or("HOST", DEFAULT_HOST),
            http_port: env_var_or("HTTP_PORT", &DEFAULT_HTTP_PORT.to_string())
                .parse()
                .context("Invalid HTTP_PORT value")?,
            cache: CacheConfig {
                backend: parse_cache_backend(&env_var_or("CACHE_BACKEND", "file"))?,
                directory: PathBuf::from(env_var_or("USDA_CACHE_DIR", cache::DEFAULT_CACHE_DIR)),
                max_entries: env_var_or(
                    "CACHE_MAX_ENTRIES",
                    &cache::DEFAULT_CACHE_MAX_ENTRIES.to_string(),
                )
                .parse()
                .context("Invalid CACHE_MAX_ENTRIES value")?,
            },
            usda: UsdaSettings {
                api_key: non_empty_var("USDA_API_KEY"),
                base_url: env_var_or("USDA_BASE_URL", usda::DEFAULT_BASE_URL),
                timeout_secs: env_var_or(
                    "USDA_TIMEOUT_SECS",
                    &usda::REQUEST_TIMEOUT_SECS.to_string(),
                )
                .parse()
                .context("Invalid USDA_TIMEOUT_SECS value")?,
            },
            llm: llm_settings()?,
            detection_min_confidence,
        })
    }

    /// Socket address string to bind
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.http_port)
    }

    /// Human-readable configuration without secrets
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "BiteWise Server Configuration:\n\
             - Bind: {}\n\
             - Cache: {}\n\
             - USDA API: {}\n\
             - LLM Chat: {}\n\
             - Detection Min Confidence: {}",
            self.bind_address(),
            match self.cache.backend {
                CacheBackend::File => format!("file ({})", self.cache.directory.display()),
                CacheBackend::Memory => format!("memory ({} entries)", self.cache.max_entries),
            },
            if self.usda.api_key.is_some() {
                "Enabled"
            } else {
                "Cache only"
            },
            self.llm
                .as_ref()
                .map_or_else(|| "Disabled".to_owned(), |l| format!("Enabled ({})", l.model)),
            self.detection_min_confidence,
        )
    }
}

fn llm_settings() -> Result<Option<LlmSettings>> {
    let Some(api_key) = LLM_API_KEY_VARS.iter().find_map(|var| non_empty_var(var)) else {
        return Ok(None);
    };
    Ok(Some(LlmSettings {
        api_key,
        base_url: env_var_or("OPENAI_BASE_URL", llm::DEFAULT_BASE_URL),
        model: env_var_or("OPENAI_MODEL", llm::DEFAULT_MODEL),
        timeout_secs: env_var_or("LLM_TIMEOUT_SECS", &llm::REQUEST_TIMEOUT_SECS.to_string())
            .parse()
            .context("Invalid LLM_TIMEOUT_SECS value")?,
    }))
}

fn parse_cache_backend(value: &str) -> Result<CacheBackend> {
    match value.trim().to_lowercase().as_str() {
        "file" => Ok(CacheBackend::File),
        "memory" => Ok(CacheBackend::Memory),
        other => bail!("Invalid CACHE_BACKEND value '{other}', expected 'file' or 'memory'"),
    }
}

fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
