//! Encoded analysis results.

mod png;

pub use self::png::{encode_gray_png, encode_rgb_png};

use crate::score::Metrics;

/// Which raster an encoded buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    Original,
    Segmented,
    ShadowOverlay,
    Edges,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Artifact::Original,
        Artifact::Segmented,
        Artifact::ShadowOverlay,
        Artifact::Edges,
    ];

    /// File name used when the artifact is written to disk or served.
    pub fn file_name(self) -> &'static str {
        match self {
            Artifact::Original => "original.png",
            Artifact::Segmented => "segmented.png",
            Artifact::ShadowOverlay => "shadow.png",
            Artifact::Edges => "edges.png",
        }
    }

    /// Inverse of [`Artifact::file_name`].
    pub fn from_file_name(name: &str) -> Option<Artifact> {
        Artifact::ALL.into_iter().find(|a| a.file_name() == name)
    }
}

/// Metrics plus the four PNG buffers of one analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub metrics: Metrics,
    /// Copy of the input, RGB.
    pub original: Vec<u8>,
    /// Posterized image, RGB.
    pub segmented: Vec<u8>,
    /// Shadow mask visualization, RGB.
    pub shadow_overlay: Vec<u8>,
    /// Edge map, 8-bit grayscale.
    pub edges: Vec<u8>,
}

impl AnalysisOutput {
    pub fn artifact(&self, artifact: Artifact) -> &[u8] {
        match artifact {
            Artifact::Original => &self.original,
            Artifact::Segmented => &self.segmented,
            Artifact::ShadowOverlay => &self.shadow_overlay,
            Artifact::Edges => &self.edges,
        }
    }
}
