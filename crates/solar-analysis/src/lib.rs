//! solar-analysis: heuristic solar potential of rooftop photographs
//!
//! The crate turns one photograph into two scalars and four rasters:
//!
//! - `avg_brightness`: mean grayscale value
//! - `solar_potential_score`: bright-area coverage minus shadow coverage,
//!   both measured as the mean of a {0, 255} mask
//! - a posterized (k-means segmented) image, a shadow overlay, an edge map and
//!   a copy of the original, all PNG encoded
//!
//! It knows nothing about HTTP, templates or files; callers hand in bytes and
//! receive bytes.
//!
//! # Quick Start
//!
//! ```no_run
//! use solar_analysis::SolarAnalyzer;
//!
//! let bytes = std::fs::read("roof.jpg").unwrap();
//! let output = SolarAnalyzer::new().seed(42).analyze(&bytes).unwrap();
//!
//! println!("brightness {:.2}", output.metrics.avg_brightness);
//! println!("score {:.2}", output.metrics.solar_potential_score);
//! ```
//!
//! # Pipeline
//!
//! ```text
//! bytes
//!   |
//!   v
//! decode ----> RGB grid ----> segment (k-means) ----> segmented image
//!   |
//!   +-------> gray grid --+--> threshold + close --> cleaned mask --> overlay
//!                         |                              |
//!                         +--> Sobel + NMS + hysteresis  |
//!                         |        |                     |
//!                         |     edge map                 |
//!                         |                              v
//!                         +--> bright band ---------> score
//! ```
//!
//! Stages after decoding read only the decoded grids, never each other's
//! outputs, except the scorer, which reads the cleaned shadow mask.
//!
//! # Determinism
//!
//! Everything but clustering initialization is deterministic. Pass a seed
//! (see [`SolarAnalyzer::seed`]) to make clustering reproducible as well.

pub mod api;
pub mod decode;
pub mod edges;
pub mod output;
pub mod score;
pub mod segment;
pub mod shadow;


pub use api::{Analysis, AnalysisError, AnalysisParams, SolarAnalyzer};
pub use decode::DecodedImage;
pub use output::{AnalysisOutput, Artifact};
pub use score::Metrics;
pub use segment::{KMeansOptions, LabelGrid, Segmentation};
pub use shadow::{Mask, ShadowDetection};
