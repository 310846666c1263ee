//! Morphology with a square all-ones structuring element.
//!
//! The window is clipped to the image, so pixels outside the image never
//! take part: dilation never grows in from the border and erosion never eats
//! in from it. A square element is separable, so each operation is a
//! horizontal pass followed by a vertical pass.

use image::GrayImage;

/// Square structuring element of odd side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareElement {
    radius: u32,
}

impl SquareElement {
    /// Element of side `2 * radius + 1`.
    pub const fn with_radius(radius: u32) -> Self {
        Self { radius }
    }

    /// The 5 x 5 element used for shadow cleaning.
    pub const FIVE: Self = Self::with_radius(2);

    #[inline]
    pub fn side(&self) -> u32 {
        2 * self.radius + 1
    }
}

#[derive(Clone, Copy)]
enum Extremum {
    Max,
    Min,
}

impl Extremum {
    #[inline]
    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Extremum::Max => a.max(b),
            Extremum::Min => a.min(b),
        }
    }
}

/// Maximum over the element window at every pixel.
pub fn dilate(image: &GrayImage, element: SquareElement) -> GrayImage {
    filter(image, element, Extremum::Max)
}

/// Minimum over the element window at every pixel.
pub fn erode(image: &GrayImage, element: SquareElement) -> GrayImage {
    filter(image, element, Extremum::Min)
}

/// Dilation followed by erosion: fills holes and gaps narrower than the
/// element without growing the overall footprint.
pub fn close(image: &GrayImage, element: SquareElement) -> GrayImage {
    erode(&dilate(image, element), element)
}

fn filter(image: &GrayImage, element: SquareElement, op: Extremum) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let w = width as usize;
    let h = height as usize;
    let r = element.radius as usize;
    let src = image.as_raw();

    let mut horizontal = vec![0u8; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(w - 1);
            horizontal[y * w + x] = row[lo..=hi]
                .iter()
                .copied()
                .reduce(|a, b| op.pick(a, b))
                .unwrap_or(row[x]);
        }
    }

    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let lo = y.saturating_sub(r);
        let hi = (y + r).min(h - 1);
        for x in 0..w {
            let mut acc = horizontal[lo * w + x];
            for yy in lo + 1..=hi {
                acc = op.pick(acc, horizontal[yy * w + x]);
            }
            out[y * w + x] = acc;
        }
    }

    GrayImage::from_raw(width, height, out).unwrap_or_else(|| image.clone())
}
