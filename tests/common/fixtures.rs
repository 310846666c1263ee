//! Test images.

use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

fn encode_as(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, format)
        .expect("Failed to encode fixture");
    out.into_inner()
}

fn encode(img: &RgbImage) -> Vec<u8> {
    encode_as(img, ImageFormat::Png)
}

/// 4x4-block checkerboard of two grays, JPEG encoded
pub fn checkerboard_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        if (x / 4 + y / 4) % 2 == 0 {
            Rgb([20, 20, 20])
        } else {
            Rgb([230, 230, 230])
        }
    });
    encode_as(&img, ImageFormat::Jpeg)
}

/// Uniform image
pub fn solid_png(width: u32, height: u32, color: [u8; 3]) -> Vec<u8> {
    encode(&RgbImage::from_pixel(width, height, Rgb(color)))
}

/// Left half near-black, right half near-white
pub fn two_tone_png(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([10, 10, 10])
        } else {
            Rgb([240, 240, 240])
        }
    });
    encode(&img)
}

/// Bright image whose score exceeds the default caution threshold
pub fn white_png() -> Vec<u8> {
    solid_png(10, 10, [255, 255, 255])
}

/// Image that is shadow everywhere (score -255)
pub fn black_png() -> Vec<u8> {
    solid_png(10, 10, [0, 0, 0])
}

/// Decode PNG bytes into an RGB grid
pub fn decode(png: &[u8]) -> RgbImage {
    image::load_from_memory(png)
        .expect("Not a decodable image")
        .to_rgb8()
}
