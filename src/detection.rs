// ABOUTME: Meal analysis from object-detector output: portions, resolution, and aggregation
// ABOUTME: Invalid batches degrade to the default meal with an explicit error message
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Meal Analyzer
//!
//! Consumes a [`DetectionBatch`] (image size plus detector boxes), estimates a
//! portion for every confident detection, resolves each label, and sums the
//! result into a [`MealAnalysis`]. Nothing here fails outward: a batch that
//! cannot be analyzed yields the default meal with `error` set.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::constants::meal::ANALYSIS_FAILED_MESSAGE;
use crate::errors::{AppError, AppResult};
use crate::meal::{MealAggregate, MealAggregator};
use crate::models::{DetectedItem, ImageDimensions, NutritionTotals, ResolvedFood};
use crate::portion::estimate_grams;
use crate::resolver::{MacroResolver, Resolution};

/// Detector output for one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionBatch {
    /// Decoded pixel dimensions of the analyzed image
    pub image: ImageDimensions,
    /// Detections in detector order
    #[serde(default)]
    pub detections: Vec<DetectedItem>,
}

impl DetectionBatch {
    /// Reject batches the portion model cannot interpret
    ///
    /// # Errors
    ///
    /// Returns an error for a zero-sized image or a detection with
    /// non-finite coordinates or confidence
    pub fn validate(&self) -> AppResult<()> {
        if self.image.width == 0 || self.image.height == 0 {
            return Err(AppError::invalid_input(format!(
                "Image dimensions must be positive, got {}x{}",
                self.image.width, self.image.height
            )));
        }
        for detection in &self.detections {
            if !detection.bounding_box.is_finite() {
                return Err(AppError::invalid_input(format!(
                    "Bounding box for '{}' has non-finite coordinates",
                    detection.class_name
                )));
            }
            if !detection.confidence.is_finite() {
                return Err(AppError::invalid_input(format!(
                    "Confidence for '{}' is not a number",
                    detection.class_name
                )));
            }
        }
        Ok(())
    }
}

/// Response body of a meal analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealAnalysis {
    /// Names of the items in the meal
    pub predicted_classes: Vec<String>,
    /// Total calories
    pub predicted_calories: u32,
    /// Resolved items
    pub detected_foods: Vec<ResolvedFood>,
    /// Meal display name
    pub meal_name: String,
    /// Items with their totals
    pub meal: MealAggregate,
    /// Same totals as `meal.nutrition`
    pub total_nutrition: NutritionTotals,
    /// Set when the batch could not be analyzed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MealAnalysis {
    fn from_meal(meal: MealAggregate, error: Option<String>) -> Self {
        Self {
            predicted_classes: meal.items.iter().map(|item| item.name.clone()).collect(),
            predicted_calories: meal.totals.calories,
            detected_foods: meal.items.clone(),
            meal_name: meal.name.clone(),
            total_nutrition: meal.totals,
            meal,
            error,
        }
    }

    /// Default meal reported when analysis fails
    #[must_use]
    pub fn fallback() -> Self {
        Self::from_meal(
            MealAggregator::default_meal(),
            Some(ANALYSIS_FAILED_MESSAGE.to_owned()),
        )
    }
}

/// Detection batch to meal pipeline
pub struct MealAnalyzer {
    resolver: Arc<MacroResolver>,
    aggregator: MealAggregator,
    min_confidence: f64,
}

impl MealAnalyzer {
    /// Analyzer that ignores detections below `min_confidence`
    #[must_use]
    pub fn new(resolver: Arc<MacroResolver>, min_confidence: f64) -> Self {
        Self {
            resolver,
            aggregator: MealAggregator,
            min_confidence,
        }
    }

    /// Analyze a batch; invalid input yields [`MealAnalysis::fallback`]
    pub async fn analyze(&self, batch: &DetectionBatch) -> MealAnalysis {
        match self.try_analyze(batch).await {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!(error = %e, "Meal analysis failed, returning default meal");
                MealAnalysis::fallback()
            }
        }
    }

    async fn try_analyze(&self, batch: &DetectionBatch) -> AppResult<MealAnalysis> {
        batch.validate()?;

        let mut items = Vec::with_capacity(batch.detections.len());
        for detection in &batch.detections {
            if detection.confidence < self.min_confidence {
                debug!(
                    class = %detection.class_name,
                    confidence = detection.confidence,
                    "Skipping low-confidence detection"
                );
                continue;
            }
            let grams = estimate_grams(&detection.bounding_box, batch.image);
            match self.resolver.resolve(&detection.class_name, grams).await {
                Resolution::Resolved { food, .. } => {
                    items.push(food.with_confidence(detection.confidence));
                }
                Resolution::NotFood => {
                    debug!(class = %detection.class_name, "Ignoring non-food detection");
                }
            }
        }

        Ok(MealAnalysis::from_meal(self.aggregator.aggregate(items), None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BoundingBox;

    fn batch(width: u32, height: u32, bbox: BoundingBox) -> DetectionBatch {
        DetectionBatch {
            image: ImageDimensions { width, height },
            detections: vec![DetectedItem {
                class_name: "pizza".to_owned(),
                confidence: 0.8,
                bounding_box: bbox,
            }],
        }
    }

    #[test]
    fn test_validate() {
        let good = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(batch(640, 480, good).validate().is_ok());
        assert!(batch(0, 480, good).validate().is_err());
        let bad = BoundingBox::new(0.0, f64::INFINITY, 10.0, 10.0);
        assert!(batch(640, 480, bad).validate().is_err());
    }

    #[test]
    fn test_fallback_shape() {
        let analysis = MealAnalysis::fallback();
        assert_eq!(analysis.predicted_classes, vec!["Food Item".to_owned()]);
        assert_eq!(analysis.predicted_calories, 300);
        assert_eq!(analysis.meal_name, "Food Item");
        assert_eq!(analysis.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    }

    #[test]
    fn test_wire_format() {
        let body = serde_json::json!({
            "image": {"width": 100, "height": 100},
            "detections": [{"className": "apple", "confidence": 0.9, "boundingBox": [0, 0, 50, 50]}]
        });
        let parsed: DetectionBatch = serde_json::from_value(body).unwrap();
        assert_eq!(parsed.detections[0].bounding_box, BoundingBox::new(0.0, 0.0, 50.0, 50.0));

        let json = serde_json::to_value(MealAnalysis::fallback()).unwrap();
        assert!(json.get("predictedClasses").is_some());
        assert!(json["meal"].get("nutrition").is_some());
        assert_eq!(json["totalNutrition"]["calories"], 300);
    }
}
