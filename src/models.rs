// ABOUTME: Core data models for macro records, resolved foods, detections, and search hits
// ABOUTME: Wire names match the cache file format and the JSON API (camelCase where the API uses it)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Data Models
//!
//! - [`MacroSet`] is the five-field nutrient tuple, per 100 g unless scaled.
//! - [`FoodRecord`] is a catalog entry.
//! - [`ResolvedFood`] is a portion-scaled result of resolution.
//! - [`DetectedItem`] is one box reported by the upstream detector.
//! - [`SearchCandidate`] / [`SearchHit`] are provider and merged search results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::resolution::REFERENCE_GRAMS;
use crate::utils::{round_tenth, round_whole};

/// Calories, protein, carbs, fat and fiber
///
/// Serialized with exactly these five keys; all five are required when reading
/// a record back from the cache, so a partial payload is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MacroSet {
    /// Energy in kcal
    pub calories: f64,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Dietary fiber in grams
    pub fiber: f64,
}

impl MacroSet {
    /// Substitute record used when every tier misses
    pub const DEFAULT_FOOD: Self = Self::new(200.0, 8.0, 25.0, 8.0, 3.0);

    /// Create a macro set
    #[must_use]
    pub const fn new(calories: f64, protein: f64, carbs: f64, fat: f64, fiber: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
            fiber,
        }
    }

    /// A record with exactly zero calories marks a detector class that is not food
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_non_food(&self) -> bool {
        self.calories == 0.0
    }

    /// Parse a macro object, requiring all five fields
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    /// Parse a cached detail payload: its `macros` object, or the payload itself
    #[must_use]
    pub fn from_detail_payload(payload: &Value) -> Option<Self> {
        Self::from_value(payload.get("macros").unwrap_or(payload))
    }
}

/// A named per-100g record in the food catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodRecord {
    /// Lowercased lookup name
    pub name: String,
    /// Macros per 100 g
    pub macros: MacroSet,
}

impl FoodRecord {
    /// Create a record; the name is lowercased and trimmed
    #[must_use]
    pub fn new(name: &str, macros: MacroSet) -> Self {
        Self {
            name: name.trim().to_lowercase(),
            macros,
        }
    }
}

/// A food scaled to a concrete portion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedFood {
    /// Display name
    pub name: String,
    /// Portion in grams
    pub grams: u32,
    /// Energy in kcal, rounded to a whole number
    pub calories: u32,
    /// Protein in grams, one decimal
    pub protein: f64,
    /// Carbohydrates in grams, one decimal
    pub carbs: f64,
    /// Fat in grams, one decimal
    pub fat: f64,
    /// Fiber in grams, one decimal
    pub fiber: f64,
    /// Detector confidence in percent, when the food came from an image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<u32>,
}

impl ResolvedFood {
    /// Scale a per-100g record to `grams`
    #[must_use]
    pub fn from_per_100g(name: String, grams: u32, per_100g: &MacroSet) -> Self {
        let scale = |per_100g: f64| per_100g * f64::from(grams) / REFERENCE_GRAMS;
        Self {
            name,
            grams,
            calories: round_whole(scale(per_100g.calories)),
            protein: round_tenth(scale(per_100g.protein)),
            carbs: round_tenth(scale(per_100g.carbs)),
            fat: round_tenth(scale(per_100g.fat)),
            fiber: round_tenth(scale(per_100g.fiber)),
            confidence: None,
        }
    }

    /// Attach a detector confidence given in `[0, 1]`
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = Some(round_whole(confidence.clamp(0.0, 1.0) * 100.0));
        self
    }

    /// Macro portion of this food, for API payloads that nest macros
    #[must_use]
    pub fn nutrition(&self) -> NutritionTotals {
        NutritionTotals {
            calories: self.calories,
            protein: self.protein,
            carbs: self.carbs,
            fat: self.fat,
            fiber: self.fiber,
        }
    }
}

/// Summed (or single-item) nutrition with API rounding applied
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NutritionTotals {
    /// Energy in kcal
    pub calories: u32,
    /// Protein in grams
    pub protein: f64,
    /// Carbohydrates in grams
    pub carbs: f64,
    /// Fat in grams
    pub fat: f64,
    /// Fiber in grams
    pub fiber: f64,
}

/// Where a resolved record came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FoodSource {
    /// Curated or cache-enriched catalog entry
    Local,
    /// Provider data read back from the cache; reported as the provider
    #[serde(rename = "usda")]
    Cache,
    /// Provider data fetched during this request
    Usda,
    /// Fixed default record
    Default,
}

impl FoodSource {
    /// Wire tag for this source
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Cache | Self::Usda => "usda",
            Self::Default => "default",
        }
    }
}

/// Pixel box reported by the detector as `[x1, y1, x2, y2]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    /// Left edge
    pub x1: f64,
    /// Top edge
    pub y1: f64,
    /// Right edge
    pub x2: f64,
    /// Bottom edge
    pub y2: f64,
}

impl BoundingBox {
    /// Create a box from corner coordinates
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Box area; inverted boxes have zero area
    #[must_use]
    pub fn area(&self) -> f64 {
        let width = (self.x2 - self.x1).max(0.0);
        let height = (self.y2 - self.y1).max(0.0);
        width * height
    }

    /// All four coordinates are finite numbers
    #[must_use]
    pub fn is_finite(&self) -> bool {
        [self.x1, self.y1, self.x2, self.y2]
            .iter()
            .all(|c| c.is_finite())
    }
}

impl From<[f64; 4]> for BoundingBox {
    fn from([x1, y1, x2, y2]: [f64; 4]) -> Self {
        Self::new(x1, y1, x2, y2)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.x1, b.y1, b.x2, b.y2]
    }
}

/// Decoded image size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageDimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl ImageDimensions {
    /// Image area in square pixels
    #[must_use]
    pub fn area(&self) -> f64 {
        f64::from(self.width) * f64::from(self.height)
    }
}

/// One detection from the upstream detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectedItem {
    /// Detector class label
    pub class_name: String,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    /// Pixel box
    pub bounding_box: BoundingBox,
}

/// One provider search result, as cached under `search_<query>.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCandidate {
    /// Provider ID
    pub id: String,
    /// Provider description
    pub name: String,
    /// Brand owner for branded foods
    #[serde(default)]
    pub brand: Option<String>,
}

impl SearchCandidate {
    /// Parse one cached result; IDs may be strings or numbers
    #[must_use]
    pub fn from_value(item: &Value) -> Option<Self> {
        let id = match item.get("id")? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let name = item.get("name").and_then(Value::as_str).unwrap_or_default();
        Some(Self {
            id,
            name: name.to_owned(),
            brand: item
                .get("brand")
                .and_then(Value::as_str)
                .map(ToOwned::to_owned),
        })
    }

    /// Parse a cached `{results: [...]}` payload; `None` when the shape is wrong,
    /// malformed items are skipped
    #[must_use]
    pub fn list_from_payload(payload: &Value) -> Option<Vec<Self>> {
        let items = payload.get("results")?.as_array()?;
        Some(items.iter().filter_map(Self::from_value).collect())
    }
}

/// A merged search result tagged with its source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchHit {
    /// Catalog key or provider ID
    pub id: String,
    /// Display name
    pub name: String,
    /// Brand owner, provider hits only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// Result origin
    pub source: FoodSource,
}

impl SearchHit {
    /// Hit for a catalog key
    #[must_use]
    pub fn local(key: &str, name: String) -> Self {
        Self {
            id: key.to_owned(),
            name,
            brand: None,
            source: FoodSource::Local,
        }
    }

    /// Hit for a provider candidate
    #[must_use]
    pub fn remote(candidate: SearchCandidate) -> Self {
        Self {
            id: candidate.id,
            name: candidate.name,
            brand: candidate.brand,
            source: FoodSource::Usda,
        }
    }
}
