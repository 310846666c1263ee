//! Color segmentation by k-means clustering.
//!
//! [`segment`] treats every pixel as a 3-d color point, clusters the points
//! with [`kmeans`], and posterizes the image: each pixel takes the color of
//! its cluster center, rounded to the nearest integer channel value.

mod kmeans;
mod labels;

pub use kmeans::{kmeans, KMeansOptions, KMeansResult, Point3};
pub use labels::LabelGrid;

use crate::api::AnalysisError;
use image::{Rgb, RgbImage};

/// Output of [`segment`].
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// Posterized image: every pixel equals its center color.
    pub segmented: RgbImage,
    /// Cluster label per pixel.
    pub labels: LabelGrid,
    /// Rounded center colors, indexed by label.
    pub palette: Vec<[u8; 3]>,
    /// Sum of squared distances of the winning clustering.
    pub compactness: f64,
}

/// Segment `image` into `options.k` color clusters.
pub fn segment(image: &RgbImage, options: &KMeansOptions) -> Result<Segmentation, AnalysisError> {
    let (width, height) = image.dimensions();
    let points: Vec<Point3> = image
        .pixels()
        .map(|p| [p.0[0] as f32, p.0[1] as f32, p.0[2] as f32])
        .collect();

    let result = kmeans(&points, options)?;

    let palette: Vec<[u8; 3]> = result.centers.iter().map(round_center).collect();
    let mut segmented = RgbImage::new(width, height);
    for (pixel, &label) in segmented.pixels_mut().zip(&result.labels) {
        *pixel = Rgb(palette[label as usize]);
    }

    Ok(Segmentation {
        segmented,
        labels: LabelGrid::new(result.labels, width, height),
        palette,
        compactness: result.compactness,
    })
}

#[inline]
fn round_center(center: &Point3) -> [u8; 3] {
    center.map(|v| v.round().clamp(0.0, 255.0) as u8)
}
