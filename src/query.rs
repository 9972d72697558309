// ABOUTME: Free-text query parsing into a catalog food name and a gram quantity
// ABOUTME: Longest catalog key contained in the text wins; quantities come from "<digits> g"
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Query Parser
//!
//! Turns text such as `"macros of chicken breast 150g"` into
//! `(Some("chicken breast"), 150)`. Matching is a plain substring search over
//! the catalog's queryable keys; the longest key wins so that specific foods
//! beat generic ones ("chicken breast" over "chicken"). Equal-length matches
//! are broken by key order.

use std::sync::OnceLock;

use regex::Regex;

use crate::catalog::FoodCatalog;
use crate::constants::query::{DEFAULT_GRAMS, MAX_GRAMS, MIN_GRAMS};

/// Quantity pattern: 1-4 ASCII digits, optional whitespace, `g`
static GRAMS_PATTERN: OnceLock<Option<Regex>> = OnceLock::new();

fn grams_pattern() -> Option<&'static Regex> {
    GRAMS_PATTERN
        .get_or_init(|| Regex::new(r"([0-9]{1,4})\s*g").ok())
        .as_ref()
}

/// Result of parsing a free-text food query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    /// Matched catalog key
    pub food: Option<String>,
    /// Quantity in grams
    pub grams: u32,
}

/// Matches free text against a catalog
pub struct QueryParser<'a> {
    catalog: &'a FoodCatalog,
}

impl<'a> QueryParser<'a> {
    /// Parser over the given catalog
    #[must_use]
    pub const fn new(catalog: &'a FoodCatalog) -> Self {
        Self { catalog }
    }

    /// Extract the food and quantity from `text`
    #[must_use]
    pub fn parse(&self, text: &str) -> ParsedQuery {
        ParsedQuery {
            food: self.match_food(text),
            grams: extract_grams(text),
        }
    }

    /// Longest queryable catalog key that occurs in the lowercased text
    #[must_use]
    pub fn match_food(&self, text: &str) -> Option<String> {
        let lowered = text.to_lowercase();
        self.catalog
            .queryable_keys()
            .filter(|key| lowered.contains(key))
            // Keys iterate in ascending order; on equal length the earlier key stays
            .fold(None, |best: Option<&str>, key| match best {
                Some(current) if current.len() >= key.len() => Some(current),
                _ => Some(key),
            })
            .map(ToOwned::to_owned)
    }
}

/// First "<digits> g" quantity in the text, clamped to `[1, 1000]`; 100 when absent
///
/// Only ASCII digits count; a quantity written in other scripts is skipped
/// and a later ASCII one is used instead.
#[must_use]
pub fn extract_grams(text: &str) -> u32 {
    grams_pattern()
        .and_then(|pattern| {
            pattern.captures_iter(text).find_map(|captures| {
                captures
                    .get(1)
                    .and_then(|digits| digits.as_str().parse::<u32>().ok())
            })
        })
        .map_or(DEFAULT_GRAMS, |grams| grams.clamp(MIN_GRAMS, MAX_GRAMS))
}
