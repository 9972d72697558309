// ABOUTME: Small shared helpers for display names and numeric rounding
// ABOUTME: Keeps rounding rules identical across resolution, aggregation, and chat formatting
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Round to one decimal place, half away from zero
///
/// Binary noise below 1e-6 of a tenth is discarded first so that products
/// such as `2.3 * 1.5` round as their decimal value `3.45` would.
#[must_use]
pub fn round_tenth(value: f64) -> f64 {
    let tenths = (value * 10.0 * 1e6).round() / 1e6;
    tenths.round() / 10.0
}

/// Round to a non-negative whole number, half away from zero
#[must_use]
pub fn round_whole(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}

/// Title-case a label: a letter is uppercased when the preceding character is not a letter,
/// lowercased otherwise ("hot dog" -> "Hot Dog", "CHICKEN breast" -> "Chicken Breast")
#[must_use]
pub fn title_case(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    let mut previous_is_alpha = false;
    for ch in label.chars() {
        if ch.is_alphabetic() {
            if previous_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_alpha = true;
        } else {
            out.push(ch);
            previous_is_alpha = false;
        }
    }
    out
}
