//! Shadow detection.
//!
//! Dark pixels are isolated with an inverse binary threshold, the result is
//! cleaned with a morphological closing, and the cleaned mask is turned into
//! an RGB overlay for display. The overlay is never used for scoring.

mod mask;
mod morphology;

pub use mask::{Mask, MASK_OFF, MASK_ON};
pub use morphology::{close, dilate, erode, SquareElement};

use image::{GrayImage, Rgb, RgbImage};

/// Default cutoff: gray values at or below this are shadow.
pub const DEFAULT_SHADOW_THRESHOLD: u8 = 60;

/// Overlay color for non-shadow pixels (dark blue).
pub const SHADOW_ACCENT: Rgb<u8> = Rgb([0, 0, 139]);

/// Output of [`detect_shadow`].
#[derive(Debug, Clone)]
pub struct ShadowDetection {
    /// Thresholded mask before cleaning.
    pub raw: Mask,
    /// Mask after closing with a 5 x 5 element.
    pub cleaned: Mask,
    /// Visualization of `cleaned`.
    pub overlay: RgbImage,
}

/// Inverse binary threshold: `value <= threshold` is shadow.
pub fn threshold_shadow(gray: &GrayImage, threshold: u8) -> Mask {
    Mask::from_predicate(gray, |v| v <= threshold)
}

/// Run the threshold, clean and overlay steps.
///
/// A zero-sized input produces zero-sized outputs.
pub fn detect_shadow(gray: &GrayImage, threshold: u8) -> ShadowDetection {
    let raw = threshold_shadow(gray, threshold);
    let cleaned = Mask::from_gray(close(raw.as_image(), SquareElement::FIVE));
    let overlay = shadow_overlay(&cleaned);
    ShadowDetection {
        raw,
        cleaned,
        overlay,
    }
}

/// Broadcast `mask` to RGB and paint every black pixel with [`SHADOW_ACCENT`].
pub fn shadow_overlay(mask: &Mask) -> RgbImage {
    let (width, height) = mask.dimensions();
    RgbImage::from_fn(width, height, |x, y| {
        if mask.is_set(x, y) {
            Rgb([MASK_ON; 3])
        } else {
            SHADOW_ACCENT
        }
    })
}
