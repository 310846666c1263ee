//! Fixed-point luminance conversion.
//!
//! Weights are the ITU-R BT.601 coefficients (0.299, 0.587, 0.114) scaled by
//! 2^14. They sum to exactly 16384, so pure white maps to 255 and the result
//! never needs clamping.

use image::{GrayImage, RgbImage};

const SHIFT: u32 = 14;
const R_WEIGHT: u32 = 4899;
const G_WEIGHT: u32 = 9617;
const B_WEIGHT: u32 = 1868;
const ROUND: u32 = 1 << (SHIFT - 1);

/// Luminance of a single RGB sample.
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((r as u32 * R_WEIGHT + g as u32 * G_WEIGHT + b as u32 * B_WEIGHT + ROUND) >> SHIFT) as u8
}

/// Convert a color grid to its grayscale derivative.
pub fn to_gray(color: &RgbImage) -> GrayImage {
    let (width, height) = color.dimensions();
    let data: Vec<u8> = color
        .as_raw()
        .chunks_exact(3)
        .map(|px| luminance(px[0], px[1], px[2]))
        .collect();
    // Length is width * height by construction.
    GrayImage::from_raw(width, height, data).unwrap_or_else(|| GrayImage::new(width, height))
}
