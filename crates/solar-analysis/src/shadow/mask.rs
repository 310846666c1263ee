//! Binary masks with {0, 255} values.

use image::{GrayImage, Luma};

/// Value of a set mask pixel.
pub const MASK_ON: u8 = 255;
/// Value of a cleared mask pixel.
pub const MASK_OFF: u8 = 0;

/// An H x W binary mask holding only [`MASK_ON`] and [`MASK_OFF`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask(GrayImage);

impl Mask {
    /// Mark every pixel of `gray` for which `predicate` holds.
    pub fn from_predicate(gray: &GrayImage, predicate: impl Fn(u8) -> bool) -> Self {
        let (width, height) = gray.dimensions();
        Self(GrayImage::from_fn(width, height, |x, y| {
            if predicate(gray.get_pixel(x, y).0[0]) {
                Luma([MASK_ON])
            } else {
                Luma([MASK_OFF])
            }
        }))
    }

    /// A mask with every pixel set to `on`.
    pub fn filled(width: u32, height: u32, on: bool) -> Self {
        let value = if on { MASK_ON } else { MASK_OFF };
        Self(GrayImage::from_pixel(width, height, Luma([value])))
    }

    /// Wrap a grayscale image, mapping any non-zero value to [`MASK_ON`].
    pub fn from_gray(gray: GrayImage) -> Self {
        let mut image = gray;
        for p in image.pixels_mut() {
            if p.0[0] != MASK_OFF {
                p.0[0] = MASK_ON;
            }
        }
        Self(image)
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.0.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.0.height()
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    #[inline]
    pub fn is_set(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y).0[0] == MASK_ON
    }

    /// Number of set pixels.
    pub fn count(&self) -> usize {
        self.0.as_raw().iter().filter(|&&v| v == MASK_ON).count()
    }

    /// Fraction of set pixels in [0, 1]; 0 for an empty mask.
    pub fn coverage(&self) -> f64 {
        let total = self.0.as_raw().len();
        if total == 0 {
            return 0.0;
        }
        self.count() as f64 / total as f64
    }

    /// Mean of the {0, 255} pixel values, i.e. `coverage() * 255`.
    pub fn mean(&self) -> f64 {
        self.coverage() * MASK_ON as f64
    }

    pub fn all_set(&self) -> bool {
        self.0.as_raw().iter().all(|&v| v == MASK_ON)
    }

    pub fn none_set(&self) -> bool {
        self.0.as_raw().iter().all(|&v| v == MASK_OFF)
    }

    #[inline]
    pub fn as_image(&self) -> &GrayImage {
        &self.0
    }

    #[inline]
    pub fn into_image(self) -> GrayImage {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_predicate() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([(x * 80) as u8]));
        let mask = Mask::from_predicate(&gray, |v| v <= 80);
        assert!(mask.is_set(0, 0));
        assert!(mask.is_set(1, 0));
        assert!(!mask.is_set(2, 0));
        assert_eq!(mask.count(), 2);
        assert_eq!(mask.coverage(), 0.5);
        assert_eq!(mask.mean(), 127.5);
    }

    #[test]
    fn test_from_gray_binarizes() {
        let gray = GrayImage::from_raw(3, 1, vec![0, 7, 255]).unwrap();
        let mask = Mask::from_gray(gray);
        assert_eq!(mask.as_image().as_raw(), &vec![0, 255, 255]);
    }

    #[test]
    fn test_empty_mask_statistics() {
        let mask = Mask::filled(0, 0, true);
        assert_eq!(mask.coverage(), 0.0);
        assert_eq!(mask.mean(), 0.0);
        assert!(mask.all_set());
        assert!(mask.none_set());
    }
}
