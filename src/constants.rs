// ABOUTME: Application constants grouped by domain (portions, queries, resolution, providers)
// ABOUTME: Behavioral limits live here so components and tests share a single source of truth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Constants module
//!
//! Constants are grouped into domain modules rather than one flat list.

/// Service identity
pub mod service_names {
    /// Service name used in logs and the root banner
    pub const BITEWISE_SERVER: &str = "bitewise-server";
}

/// Portion estimation from detection bounding boxes
pub mod portion {
    /// Grams assigned to a box covering the whole image (before clamping)
    pub const FULL_FRAME_GRAMS: f64 = 500.0;
    /// Smallest portion ever estimated
    pub const MIN_GRAMS: u32 = 50;
    /// Largest portion ever estimated
    pub const MAX_GRAMS: u32 = 300;
}

/// Free-text query parsing
pub mod query {
    /// Grams assumed when the text carries no quantity
    pub const DEFAULT_GRAMS: u32 = 100;
    /// Lower clamp for parsed quantities
    pub const MIN_GRAMS: u32 = 1;
    /// Upper clamp for parsed quantities
    pub const MAX_GRAMS: u32 = 1000;
}

/// Macro resolution
pub mod resolution {
    /// Reference portion all per-100g records are expressed against
    pub const REFERENCE_GRAMS: f64 = 100.0;
    /// Lower clamp for the macro-query endpoint
    pub const ENDPOINT_MIN_GRAMS: u32 = 1;
    /// Upper clamp for the macro-query endpoint
    pub const ENDPOINT_MAX_GRAMS: u32 = 2000;
}

/// Search result merging
pub mod search {
    /// Maximum merged results returned to callers
    pub const MAX_MERGED_RESULTS: usize = 20;
}

/// Meal aggregation
pub mod meal {
    /// Display name of the substitute item for an empty meal
    pub const DEFAULT_ITEM_NAME: &str = "Food Item";
    /// Portion of the substitute item
    pub const DEFAULT_ITEM_GRAMS: u32 = 150;
    /// Confidence reported for the substitute item
    pub const DEFAULT_ITEM_CONFIDENCE: u32 = 75;
    /// Meal name once there are more items than are listed by name
    pub const MIXED_MEAL_NAME: &str = "Mixed Meal";
    /// Most items joined into a meal name
    pub const MAX_NAMED_ITEMS: usize = 3;
    /// Error message attached when the detection batch cannot be processed
    pub const ANALYSIS_FAILED_MESSAGE: &str = "Could not analyze image, using default values";
}

/// USDA `FoodData` Central
pub mod usda {
    /// Public API base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.nal.usda.gov/fdc/v1";
    /// Request timeout for search and detail calls
    pub const REQUEST_TIMEOUT_SECS: u64 = 12;
    /// Results requested (and kept) per search
    pub const SEARCH_PAGE_SIZE: usize = 10;
    /// Data types included in searches
    pub const SEARCH_DATA_TYPES: [&str; 3] = ["Branded", "Survey (FNDDS)", "SR Legacy"];
    /// Description used when a search hit has none
    pub const UNNAMED_FOOD: &str = "Food";
    /// Source tag for provider-backed results
    pub const SOURCE_NAME: &str = "usda";
}

/// Chat completion service
pub mod llm {
    /// Default OpenAI-compatible base URL
    pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
    /// Default completion model
    pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
    /// Completion request timeout
    pub const REQUEST_TIMEOUT_SECS: u64 = 20;
    /// Sampling temperature for assistant replies
    pub const TEMPERATURE: f32 = 0.7;
}

/// Detection pipeline
pub mod detection {
    /// Detections below this confidence are ignored
    pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.3;
}

/// Cache backends
pub mod cache {
    /// Default on-disk cache directory
    pub const DEFAULT_CACHE_DIR: &str = "usda_cache";
    /// Default capacity of the in-memory backend
    pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1000;
}
