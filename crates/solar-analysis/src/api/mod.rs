//! Public API for the solar-analysis crate.
//!
//! This module provides the high-level API: the [`SolarAnalyzer`] builder,
//! its [`AnalysisParams`] and the [`AnalysisError`] unified error type.

mod analyzer;
mod error;
mod params;

pub use analyzer::{Analysis, SolarAnalyzer};
pub use error::AnalysisError;
pub use params::AnalysisParams;
