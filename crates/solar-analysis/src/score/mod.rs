//! Brightness statistics and the solar potential score.

use crate::shadow::Mask;
use image::GrayImage;

/// Default lower bound of the bright-area band `[bright_low, 255]`.
pub const DEFAULT_BRIGHT_LOW: u8 = 200;

/// Scalar results of one analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Mean grayscale value in [0, 255].
    pub avg_brightness: f64,
    /// `mean(bright mask) - mean(cleaned shadow mask)`, in [-255, 255].
    pub solar_potential_score: f64,
}

impl Metrics {
    pub const ZERO: Metrics = Metrics {
        avg_brightness: 0.0,
        solar_potential_score: 0.0,
    };
}

/// Mask of pixels whose gray value lies in `[bright_low, 255]`.
pub fn bright_mask(gray: &GrayImage, bright_low: u8) -> Mask {
    Mask::from_predicate(gray, |v| v >= bright_low)
}

/// Arithmetic mean of all gray values; 0 for an empty grid.
pub fn mean_brightness(gray: &GrayImage) -> f64 {
    let raw = gray.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| v as u64).sum();
    sum as f64 / raw.len() as f64
}

/// Score an image from its grayscale grid and cleaned shadow mask.
///
/// Bright area raises the score, shadow coverage lowers it. An image with no
/// pixels scores zero on both metrics.
pub fn score(gray: &GrayImage, cleaned: &Mask, bright_low: u8) -> Metrics {
    if gray.as_raw().is_empty() {
        return Metrics::ZERO;
    }
    debug_assert_eq!(gray.dimensions(), cleaned.dimensions());

    let bright = bright_mask(gray, bright_low);
    Metrics {
        avg_brightness: mean_brightness(gray),
        solar_potential_score: bright.mean() - cleaned.mean(),
    }
}
