// ABOUTME: Portion size estimation from detection bounding boxes
// ABOUTME: Maps the fraction of the image a box covers to a clamped gram weight
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use crate::constants::portion::{FULL_FRAME_GRAMS, MAX_GRAMS, MIN_GRAMS};
use crate::models::{BoundingBox, ImageDimensions};

/// Estimate grams for a detected food from the share of the image its box covers
///
/// `grams = clamp(round(box_area / image_area * 500), 50, 300)`. Degenerate
/// boxes, empty images, and non-finite coordinates give the lower bound.
#[must_use]
pub fn estimate_grams(bounding_box: &BoundingBox, image: ImageDimensions) -> u32 {
    let image_area = image.area();
    if image_area <= 0.0 {
        return MIN_GRAMS;
    }
    let area_ratio = bounding_box.area() / image_area;
    if !area_ratio.is_finite() {
        return MIN_GRAMS;
    }
    let grams = (area_ratio * FULL_FRAME_GRAMS).round();
    grams.clamp(f64::from(MIN_GRAMS), f64::from(MAX_GRAMS)) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: ImageDimensions = ImageDimensions {
        width: 1000,
        height: 1000,
    };

    #[test]
    fn test_thirty_percent_box() {
        let bbox = BoundingBox::new(0.0, 0.0, 1000.0, 300.0);
        assert_eq!(estimate_grams(&bbox, IMAGE), 150);
    }

    #[test]
    fn test_clamps() {
        let tiny = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        assert_eq!(estimate_grams(&tiny, IMAGE), 50);
        let full = BoundingBox::new(0.0, 0.0, 1000.0, 1000.0);
        assert_eq!(estimate_grams(&full, IMAGE), 300);
    }

    #[test]
    fn test_degenerate_inputs() {
        let zero = BoundingBox::new(5.0, 5.0, 5.0, 5.0);
        assert_eq!(estimate_grams(&zero, IMAGE), 50);
        let inverted = BoundingBox::new(900.0, 900.0, 0.0, 0.0);
        assert_eq!(estimate_grams(&inverted, IMAGE), 50);
        let empty_image = ImageDimensions {
            width: 0,
            height: 480,
        };
        let bbox = BoundingBox::new(0.0, 0.0, 100.0, 100.0);
        assert_eq!(estimate_grams(&bbox, empty_image), 50);
        let nan = BoundingBox::new(f64::NAN, 0.0, 100.0, 100.0);
        assert_eq!(estimate_grams(&nan, IMAGE), 50);
    }

    #[test]
    fn test_output_always_in_range() {
        for step in 0..=40 {
            let side = f64::from(step) * 50.0;
            let bbox = BoundingBox::new(0.0, 0.0, side, side);
            let grams = estimate_grams(&bbox, IMAGE);
            assert!((MIN_GRAMS..=MAX_GRAMS).contains(&grams), "{grams} out of range");
        }
    }
}
