use crate::error::ChartError;
use resvg::usvg::{self, fontdb, Transform};
use std::io::Cursor;
use std::sync::Arc;
use tiny_skia::Pixmap;

/// Rasterizes SVG documents to RGB PNG at their intrinsic size.
pub struct SvgRasterizer {
    /// Font database for text rendering
    fontdb: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    /// Create a rasterizer backed by the system fonts
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();

        tracing::debug!(
            font_count = fontdb.len(),
            "Loaded fonts for SVG text rendering"
        );

        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Render `svg` onto a white background and encode it as PNG.
    pub fn render_to_png(&self, svg: &str) -> Result<Vec<u8>, ChartError> {
        let pixmap = self.rasterize_svg(svg.as_bytes())?;
        let rgb: Vec<u8> = pixmap
            .data()
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        encode_png(pixmap.width(), pixmap.height(), &rgb)
    }

    fn rasterize_svg(&self, svg_data: &[u8]) -> Result<Pixmap, ChartError> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg_data, &options)
            .map_err(|e| ChartError::SvgParse(e.to_string()))?;

        let size = tree.size().to_int_size();
        let mut pixmap =
            Pixmap::new(size.width(), size.height()).ok_or(ChartError::PixmapAllocation)?;
        // Opaque background keeps premultiplied and straight RGB identical
        pixmap.fill(tiny_skia::Color::WHITE);

        resvg::render(&tree, Transform::identity(), &mut pixmap.as_mut());

        Ok(pixmap)
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Encode 8-bit RGB rows as PNG
fn encode_png(width: u32, height: u32, rgb: &[u8]) -> Result<Vec<u8>, ChartError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Rgb);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ChartError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(rgb)
            .map_err(|e| ChartError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}
