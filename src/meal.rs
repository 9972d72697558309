// ABOUTME: Meal aggregation: sums resolved items into totals and derives a display name
// ABOUTME: An empty meal becomes a single default "Food Item" so responses always carry one entry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::Serialize;

use crate::constants::meal::{
    DEFAULT_ITEM_CONFIDENCE, DEFAULT_ITEM_GRAMS, DEFAULT_ITEM_NAME, MAX_NAMED_ITEMS,
    MIXED_MEAL_NAME,
};
use crate::models::{MacroSet, NutritionTotals, ResolvedFood};
use crate::utils::round_tenth;

/// Items of a meal with their summed nutrition
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealAggregate {
    /// Display name
    pub name: String,
    /// Resolved items in detection order
    pub items: Vec<ResolvedFood>,
    /// Sum over `items`
    #[serde(rename = "nutrition")]
    pub totals: NutritionTotals,
}

/// Builds [`MealAggregate`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct MealAggregator;

impl MealAggregator {
    /// Sum `items` and name the meal
    ///
    /// One item keeps its name, two or three are joined with `" + "`, more
    /// become "Mixed Meal".
    #[must_use]
    pub fn aggregate(&self, items: Vec<ResolvedFood>) -> MealAggregate {
        if items.is_empty() {
            return Self::default_meal();
        }
        let totals = sum_nutrition(&items);
        let name = meal_name(&items);
        MealAggregate {
            name,
            items,
            totals,
        }
    }

    /// Single-item meal used when nothing could be resolved
    #[must_use]
    pub fn default_meal() -> MealAggregate {
        let mut item = ResolvedFood::from_per_100g(
            DEFAULT_ITEM_NAME.to_owned(),
            DEFAULT_ITEM_GRAMS,
            &MacroSet::DEFAULT_FOOD,
        );
        item.confidence = Some(DEFAULT_ITEM_CONFIDENCE);
        MealAggregate {
            name: item.name.clone(),
            totals: item.nutrition(),
            items: vec![item],
        }
    }
}

fn sum_nutrition(items: &[ResolvedFood]) -> NutritionTotals {
    let raw = items.iter().fold(NutritionTotals::default(), |acc, item| NutritionTotals {
        calories: acc.calories.saturating_add(item.calories),
        protein: acc.protein + item.protein,
        carbs: acc.carbs + item.carbs,
        fat: acc.fat + item.fat,
        fiber: acc.fiber + item.fiber,
    });
    NutritionTotals {
        calories: raw.calories,
        protein: round_tenth(raw.protein),
        carbs: round_tenth(raw.carbs),
        fat: round_tenth(raw.fat),
        fiber: round_tenth(raw.fiber),
    }
}

fn meal_name(items: &[ResolvedFood]) -> String {
    if items.len() > MAX_NAMED_ITEMS {
        return MIXED_MEAL_NAME.to_owned();
    }
    items
        .iter()
        .map(|item| item.name.as_str())
        .collect::<Vec<_>>()
        .join(" + ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(name: &str) -> ResolvedFood {
        ResolvedFood::from_per_100g(name.to_owned(), 100, &MacroSet::new(100.0, 1.15, 2.0, 3.0, 0.5))
    }

    #[test]
    fn test_empty_meal_is_default_item() {
        let meal = MealAggregator.aggregate(Vec::new());
        assert_eq!(meal.name, "Food Item");
        assert_eq!(meal.items.len(), 1);
        assert_eq!(meal.items[0].grams, 150);
        assert_eq!(meal.items[0].confidence, Some(75));
        assert_eq!(meal.totals.calories, 300);
        assert!((meal.totals.protein - 12.0).abs() < f64::EPSILON);
        assert!((meal.totals.carbs - 37.5).abs() < f64::EPSILON);
        assert!((meal.totals.fat - 12.0).abs() < f64::EPSILON);
        assert!((meal.totals.fiber - 4.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_names() {
        assert_eq!(MealAggregator.aggregate(vec![item("Apple")]).name, "Apple");
        let three = vec![item("A"), item("B"), item("C")];
        assert_eq!(MealAggregator.aggregate(three).name, "A + B + C");
        let five = ["A", "B", "C", "D", "E"].map(item).to_vec();
        assert_eq!(MealAggregator.aggregate(five).name, "Mixed Meal");
    }

    #[test]
    fn test_totals_are_rounded_sums() {
        let meal = MealAggregator.aggregate(vec![item("A"), item("B"), item("C")]);
        assert_eq!(meal.totals.calories, 300);
        assert!((meal.totals.fat - 9.0).abs() < f64::EPSILON);
        assert!((meal.totals.protein - 3.6).abs() < 1e-9);
    }
}
