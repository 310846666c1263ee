//! PNG encoding of analysis rasters.

use std::io::Cursor;

use crate::api::AnalysisError;
use image::{GrayImage, RgbImage};

/// Encode an 8-bit RGB image.
pub fn encode_rgb_png(image: &RgbImage) -> Result<Vec<u8>, AnalysisError> {
    encode_png(
        image.width(),
        image.height(),
        png::ColorType::Rgb,
        image.as_raw(),
    )
}

/// Encode an 8-bit grayscale image.
pub fn encode_gray_png(image: &GrayImage) -> Result<Vec<u8>, AnalysisError> {
    encode_png(
        image.width(),
        image.height(),
        png::ColorType::Grayscale,
        image.as_raw(),
    )
}

fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    data: &[u8],
) -> Result<Vec<u8>, AnalysisError> {
    if width == 0 || height == 0 {
        return Err(AnalysisError::Encode(format!(
            "cannot encode a {width}x{height} image"
        )));
    }

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(data)?;
    }
    Ok(buf.into_inner())
}
