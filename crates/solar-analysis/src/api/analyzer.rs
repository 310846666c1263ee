//! SolarAnalyzer builder -- the primary entry point for the crate.
//!
//! [`SolarAnalyzer`] wires decoding, segmentation, shadow detection, edge
//! extraction and scoring into one call with fluent configuration.

use image::GrayImage;

use super::error::AnalysisError;
use super::params::AnalysisParams;
use crate::decode::DecodedImage;
use crate::edges::detect_edges;
use crate::output::{encode_gray_png, encode_rgb_png, AnalysisOutput};
use crate::score::{score, Metrics};
use crate::segment::{segment, KMeansOptions, Segmentation};
use crate::shadow::{detect_shadow, ShadowDetection};

/// High-level analysis builder.
///
/// # Design
///
/// - Configuration methods consume and return `self`
/// - [`analyze()`](Self::analyze) takes `&self`, so one analyzer serves any
///   number of images
/// - Every invocation allocates its own grids; nothing is shared between runs
///
/// # Example
///
/// ```
/// use image::{Rgb, RgbImage};
/// use solar_analysis::{DecodedImage, SolarAnalyzer};
///
/// let image = DecodedImage::from_rgb(RgbImage::from_pixel(8, 8, Rgb([250, 250, 250]))).unwrap();
/// let analysis = SolarAnalyzer::new().clusters(2).seed(7).analyze_image(&image).unwrap();
///
/// assert_eq!(analysis.metrics.avg_brightness, 250.0);
/// assert_eq!(analysis.metrics.solar_potential_score, 255.0);
/// ```
#[derive(Debug, Clone)]
pub struct SolarAnalyzer {
    kmeans: KMeansOptions,
    shadow_threshold: u8,
    edge_low: u32,
    edge_high: u32,
    bright_low: u8,
}

impl Default for SolarAnalyzer {
    fn default() -> Self {
        Self::from_params(AnalysisParams::default())
    }
}

impl SolarAnalyzer {
    /// Create an analyzer with default parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an analyzer from a parameter set.
    pub fn from_params(params: AnalysisParams) -> Self {
        Self {
            kmeans: KMeansOptions {
                k: params.k,
                seed: params.seed,
                ..KMeansOptions::default()
            },
            shadow_threshold: params.shadow_threshold,
            edge_low: params.edge_low,
            edge_high: params.edge_high,
            bright_low: params.bright_low,
        }
    }

    /// The documented parameters currently in effect.
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            k: self.kmeans.k,
            shadow_threshold: self.shadow_threshold,
            edge_low: self.edge_low,
            edge_high: self.edge_high,
            bright_low: self.bright_low,
            seed: self.kmeans.seed,
        }
    }

    /// Set the number of color clusters.
    #[inline]
    pub fn clusters(mut self, k: usize) -> Self {
        self.kmeans.k = k;
        self
    }

    /// Set the number of clustering restarts.
    #[inline]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.kmeans.attempts = attempts;
        self
    }

    /// Set the iteration cap per clustering attempt.
    #[inline]
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.kmeans.max_iterations = max_iterations;
        self
    }

    /// Seed the clustering for reproducible output.
    #[inline]
    pub fn seed(mut self, seed: u64) -> Self {
        self.kmeans.seed = Some(seed);
        self
    }

    #[inline]
    pub fn shadow_threshold(mut self, threshold: u8) -> Self {
        self.shadow_threshold = threshold;
        self
    }

    #[inline]
    pub fn edge_thresholds(mut self, low: u32, high: u32) -> Self {
        self.edge_low = low;
        self.edge_high = high;
        self
    }

    #[inline]
    pub fn bright_threshold(mut self, bright_low: u8) -> Self {
        self.bright_low = bright_low;
        self
    }

    /// Decode `bytes`, run the pipeline and encode the four rasters as PNG.
    pub fn analyze(&self, bytes: &[u8]) -> Result<AnalysisOutput, AnalysisError> {
        let image = DecodedImage::decode(bytes)?;
        self.analyze_image(&image)?.encode(&image)
    }

    /// Run the pipeline on an already decoded image, keeping every
    /// intermediate grid in memory.
    pub fn analyze_image(&self, image: &DecodedImage) -> Result<Analysis, AnalysisError> {
        let segmentation = segment(image.color(), &self.kmeans)?;
        let shadow = detect_shadow(image.gray(), self.shadow_threshold);
        let edges = detect_edges(image.gray(), self.edge_low, self.edge_high);
        let metrics = score(image.gray(), &shadow.cleaned, self.bright_low);

        Ok(Analysis {
            metrics,
            segmentation,
            shadow,
            edges,
        })
    }
}

/// In-memory result of one pipeline run.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub metrics: Metrics,
    pub segmentation: Segmentation,
    pub shadow: ShadowDetection,
    /// {0, 255} edge map.
    pub edges: GrayImage,
}

impl Analysis {
    /// Encode the rasters; `image` is the input the analysis was run on.
    pub fn encode(&self, image: &DecodedImage) -> Result<AnalysisOutput, AnalysisError> {
        Ok(AnalysisOutput {
            metrics: self.metrics,
            original: encode_rgb_png(image.color())?,
            segmented: encode_rgb_png(&self.segmentation.segmented)?,
            shadow_overlay: encode_rgb_png(&self.shadow.overlay)?,
            edges: encode_gray_png(&self.edges)?,
        })
    }
}
