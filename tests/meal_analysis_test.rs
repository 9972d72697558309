// ABOUTME: Integration tests for meal analysis from detector output
// ABOUTME: Covers portion estimation, confidence filtering, non-food classes, and the fallback meal
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use bitewise::constants::meal::ANALYSIS_FAILED_MESSAGE;
use bitewise::detection::DetectionBatch;
use common::ScriptedProvider;
use serde_json::{json, Value};

fn batch(value: Value) -> DetectionBatch {
    serde_json::from_value(value).unwrap()
}

#[tokio::test]
async fn test_single_pizza_slice() {
    let resources = common::test_resources(Arc::new(ScriptedProvider::new()), None);
    let analysis = resources
        .analyzer
        .analyze(&batch(json!({
            "image": {"width": 1000, "height": 1000},
            "detections": [
                {"className": "pizza", "confidence": 0.8, "boundingBox": [0, 0, 1000, 300]}
            ]
        })))
        .await;

    assert!(analysis.error.is_none());
    assert_eq!(analysis.meal_name, "Pizza");
    assert_eq!(analysis.predicted_classes, vec!["Pizza".to_owned()]);
    assert_eq!(analysis.predicted_calories, 399);

    let pizza = &analysis.detected_foods[0];
    assert_eq!(pizza.grams, 150);
    assert_eq!(pizza.confidence, Some(80));

    let totals = analysis.total_nutrition;
    assert_eq!(totals.calories, 399);
    assert!((totals.protein - 16.5).abs() < f64::EPSILON);
    assert!((totals.carbs - 49.5).abs() < f64::EPSILON);
    assert!((totals.fat - 15.0).abs() < f64::EPSILON);
    assert!((totals.fiber - 3.5).abs() < f64::EPSILON);
    assert_eq!(analysis.meal.totals, totals);
}

#[tokio::test]
async fn test_low_confidence_and_non_food_are_dropped() {
    let provider = Arc::new(ScriptedProvider::new());
    let resources = common::test_resources(Arc::clone(&provider), None);
    let analysis = resources
        .analyzer
        .analyze(&batch(json!({
            "image": {"width": 640, "height": 480},
            "detections": [
                {"className": "person", "confidence": 0.99, "boundingBox": [0, 0, 640, 480]},
                {"className": "banana", "confidence": 0.2, "boundingBox": [0, 0, 100, 100]},
                {"className": "apple", "confidence": 0.9, "boundingBox": [10, 10, 110, 110]},
                {"className": "orange", "confidence": 0.7, "boundingBox": [200, 200, 300, 300]}
            ]
        })))
        .await;

    assert_eq!(analysis.predicted_classes, vec!["Apple".to_owned(), "Orange".to_owned()]);
    assert_eq!(analysis.meal_name, "Apple + Orange");
    assert_eq!(provider.search_calls(), 0);
}

#[tokio::test]
async fn test_many_items_make_a_mixed_meal() {
    let resources = common::test_resources(Arc::new(ScriptedProvider::new()), None);
    let detections: Vec<Value> = ["apple", "banana", "orange", "broccoli"]
        .iter()
        .map(|name| json!({"className": name, "confidence": 0.9, "boundingBox": [0, 0, 100, 100]}))
        .collect();

    let analysis = resources
        .analyzer
        .analyze(&batch(json!({
            "image": {"width": 1000, "height": 1000},
            "detections": detections
        })))
        .await;

    assert_eq!(analysis.detected_foods.len(), 4);
    assert_eq!(analysis.meal_name, "Mixed Meal");
    let summed: u32 = analysis.detected_foods.iter().map(|f| f.calories).sum();
    assert_eq!(analysis.predicted_calories, summed);
}

#[tokio::test]
async fn test_nothing_resolved_yields_default_meal() {
    let resources = common::test_resources(Arc::new(ScriptedProvider::new()), None);
    let analysis = resources
        .analyzer
        .analyze(&batch(json!({
            "image": {"width": 10, "height": 10},
            "detections": [
                {"className": "car", "confidence": 0.95, "boundingBox": [0, 0, 10, 10]}
            ]
        })))
        .await;

    assert!(analysis.error.is_none());
    assert_eq!(analysis.meal_name, "Food Item");
    assert_eq!(analysis.predicted_calories, 300);
    assert_eq!(analysis.detected_foods.len(), 1);
}

#[tokio::test]
async fn test_invalid_image_returns_fallback() {
    let resources = common::test_resources(Arc::new(ScriptedProvider::new()), None);
    let analysis = resources
        .analyzer
        .analyze(&batch(json!({
            "image": {"width": 0, "height": 480},
            "detections": [
                {"className": "pizza", "confidence": 0.9, "boundingBox": [0, 0, 10, 10]}
            ]
        })))
        .await;

    assert_eq!(analysis.error.as_deref(), Some(ANALYSIS_FAILED_MESSAGE));
    assert_eq!(analysis.meal_name, "Food Item");
    assert_eq!(analysis.predicted_calories, 300);
    assert_eq!(analysis.detected_foods[0].confidence, Some(75));
}
