//! Image decoding.
//!
//! Turns encoded bytes into a [`DecodedImage`]: an RGB grid plus its
//! grayscale derivative. Both grids are immutable once built.

mod luma;

pub use luma::{luminance, to_gray};

use crate::api::AnalysisError;
use image::{GrayImage, RgbImage};

/// A decoded input image and its grayscale derivative.
///
/// Construction fails for zero-area images, so every `DecodedImage` has at
/// least one pixel.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    color: RgbImage,
    gray: GrayImage,
}

impl DecodedImage {
    /// Decode PNG or JPEG bytes.
    ///
    /// The format is detected from the content, not from a file name. Alpha
    /// channels are dropped.
    pub fn decode(bytes: &[u8]) -> Result<Self, AnalysisError> {
        let dynamic = image::load_from_memory(bytes)?;
        Self::from_rgb(dynamic.to_rgb8())
    }

    /// Wrap an already decoded RGB grid.
    pub fn from_rgb(color: RgbImage) -> Result<Self, AnalysisError> {
        let (width, height) = color.dimensions();
        if width == 0 || height == 0 {
            return Err(AnalysisError::EmptyImage { width, height });
        }
        let gray = to_gray(&color);
        Ok(Self { color, gray })
    }

    #[inline]
    pub fn color(&self) -> &RgbImage {
        &self.color
    }

    #[inline]
    pub fn gray(&self) -> &GrayImage {
        &self.gray
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.color.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::encode_rgb_png;
    use image::Rgb;

    #[test]
    fn test_decode_png_roundtrip_dimensions() {
        let src = RgbImage::from_pixel(5, 4, Rgb([200, 100, 50]));
        let png = encode_rgb_png(&src).unwrap();

        let decoded = DecodedImage::decode(&png).unwrap();
        assert_eq!(decoded.width(), 5);
        assert_eq!(decoded.height(), 4);
        assert_eq!(decoded.pixel_count(), 20);
        assert_eq!(decoded.color().get_pixel(2, 2), &Rgb([200, 100, 50]));
        assert_eq!(decoded.gray().get_pixel(2, 2).0[0], luminance(200, 100, 50));
    }

    #[test]
    fn test_decode_jpeg() {
        let src = RgbImage::from_fn(16, 8, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                Rgb([20, 20, 20])
            } else {
                Rgb([230, 230, 230])
            }
        });
        let mut jpeg = std::io::Cursor::new(Vec::new());
        src.write_to(&mut jpeg, image::ImageFormat::Jpeg).unwrap();

        let decoded = DecodedImage::decode(jpeg.get_ref()).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
        assert_eq!(decoded.gray().dimensions(), (16, 8));
        // Lossy, but the two tones stay far apart
        assert!(decoded.gray().get_pixel(1, 1).0[0] < 80);
        assert!(decoded.gray().get_pixel(5, 1).0[0] > 170);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = DecodedImage::decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[test]
    fn test_decode_rejects_empty_input() {
        let err = DecodedImage::decode(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::Decode(_)));
    }

    #[test]
    fn test_from_rgb_rejects_zero_area() {
        let err = DecodedImage::from_rgb(RgbImage::new(0, 3)).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::EmptyImage {
                width: 0,
                height: 3
            }
        ));
    }

    #[test]
    fn test_gray_is_deterministic() {
        let mut src = RgbImage::new(3, 1);
        src.put_pixel(0, 0, Rgb([1, 2, 3]));
        src.put_pixel(1, 0, Rgb([90, 180, 45]));
        src.put_pixel(2, 0, Rgb([255, 0, 255]));

        let a = DecodedImage::from_rgb(src.clone()).unwrap();
        let b = DecodedImage::from_rgb(src).unwrap();
        assert_eq!(a.gray().as_raw(), b.gray().as_raw());
    }
}
