//! Unified error type for the solar-analysis public API.
//!
//! [`AnalysisError`] covers every way a pipeline invocation can fail. The
//! pipeline never logs these; callers decide how to present them.

use thiserror::Error;

/// Unified error type for the solar-analysis public API.
///
/// # Example
///
/// ```
/// use solar_analysis::{AnalysisError, SolarAnalyzer};
///
/// let err = SolarAnalyzer::new().analyze(b"not an image").unwrap_err();
/// assert!(matches!(err, AnalysisError::Decode(_)));
/// ```
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Input bytes are not a readable raster image in a supported format.
    #[error("failed to decode image: {0}")]
    Decode(String),

    /// Input decoded to an image without pixels.
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    /// A pipeline parameter is outside its accepted range.
    #[error("invalid parameter `{name}`: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },

    /// Encoding an output raster failed.
    #[error("failed to encode PNG: {0}")]
    Encode(String),
}

impl AnalysisError {
    /// Whether the error was caused by the caller's input rather than by the
    /// pipeline itself.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Decode(_)
                | AnalysisError::EmptyImage { .. }
                | AnalysisError::InvalidParameter { .. }
        )
    }
}

impl From<image::ImageError> for AnalysisError {
    fn from(err: image::ImageError) -> Self {
        AnalysisError::Decode(err.to_string())
    }
}

impl From<png::EncodingError> for AnalysisError {
    fn from(err: png::EncodingError) -> Self {
        AnalysisError::Encode(err.to_string())
    }
}
