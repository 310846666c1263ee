//! Pipeline parameters.

use crate::edges::{DEFAULT_EDGE_HIGH, DEFAULT_EDGE_LOW};
use crate::score::DEFAULT_BRIGHT_LOW;
use crate::shadow::DEFAULT_SHADOW_THRESHOLD;

/// The documented, caller-tunable parameters of one analysis.
///
/// # Defaults
///
/// | Field | Value |
/// |-------|-------|
/// | `k` | 3 |
/// | `shadow_threshold` | 60 |
/// | `edge_low` | 100 |
/// | `edge_high` | 200 |
/// | `bright_low` | 200 |
/// | `seed` | `None` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisParams {
    /// Number of color clusters.
    pub k: usize,
    /// Gray values at or below this are shadow.
    pub shadow_threshold: u8,
    /// Lower hysteresis threshold on gradient magnitude.
    pub edge_low: u32,
    /// Upper hysteresis threshold on gradient magnitude.
    pub edge_high: u32,
    /// Gray values at or above this count as bright area.
    pub bright_low: u8,
    /// Clustering seed; `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            k: 3,
            shadow_threshold: DEFAULT_SHADOW_THRESHOLD,
            edge_low: DEFAULT_EDGE_LOW,
            edge_high: DEFAULT_EDGE_HIGH,
            bright_low: DEFAULT_BRIGHT_LOW,
            seed: None,
        }
    }
}
