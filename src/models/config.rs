use crate::assets::AssetLoader;
use serde::Deserialize;
use solar_analysis::AnalysisParams;
use std::path::PathBuf;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct AppConfig {
    /// Pipeline parameter defaults
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// How results are presented
    #[serde(default)]
    pub presentation: PresentationConfig,

    /// Upload reception rules
    #[serde(default)]
    pub uploads: UploadConfig,

    /// In-memory result store
    #[serde(default)]
    pub results: ResultsConfig,
}

/// Default pipeline parameters, overridable per request
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AnalysisConfig {
    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_shadow_threshold")]
    pub shadow_threshold: u8,

    #[serde(default = "default_edge_low")]
    pub edge_low: u32,

    #[serde(default = "default_edge_high")]
    pub edge_high: u32,

    #[serde(default = "default_bright_low")]
    pub bright_low: u8,

    /// Fixed clustering seed (random when absent)
    #[serde(default)]
    pub seed: Option<u64>,

    /// Per-analysis deadline in seconds (unbounded when absent or 0)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_k() -> usize {
    AnalysisParams::default().k
}

fn default_shadow_threshold() -> u8 {
    AnalysisParams::default().shadow_threshold
}

fn default_edge_low() -> u32 {
    AnalysisParams::default().edge_low
}

fn default_edge_high() -> u32 {
    AnalysisParams::default().edge_high
}

fn default_bright_low() -> u8 {
    AnalysisParams::default().bright_low
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let params = AnalysisParams::default();
        Self {
            k: params.k,
            shadow_threshold: params.shadow_threshold,
            edge_low: params.edge_low,
            edge_high: params.edge_high,
            bright_low: params.bright_low,
            seed: params.seed,
            timeout_secs: None,
        }
    }
}

impl AnalysisConfig {
    /// The configured defaults as pipeline parameters
    pub fn params(&self) -> AnalysisParams {
        AnalysisParams {
            k: self.k,
            shadow_threshold: self.shadow_threshold,
            edge_low: self.edge_low,
            edge_high: self.edge_high,
            bright_low: self.bright_low,
            seed: self.seed,
        }
    }
}

/// Interpretation of the score for display
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PresentationConfig {
    /// Scores strictly above this get the caution message
    #[serde(default = "default_caution_threshold")]
    pub caution_threshold: f64,

    /// `{threshold}` is replaced by `caution_threshold`
    #[serde(default = "default_caution_message")]
    pub caution_message: String,
}

fn default_caution_threshold() -> f64 {
    150.0
}

fn default_caution_message() -> String {
    "A solar potential score greater than {threshold} indicates this is not an ideal \
     location for solar panel installation."
        .to_string()
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            caution_threshold: default_caution_threshold(),
            caution_message: default_caution_message(),
        }
    }
}

impl PresentationConfig {
    /// Caution message for `score`, if it exceeds the threshold
    pub fn caution_for(&self, score: f64) -> Option<String> {
        (score > self.caution_threshold).then(|| {
            self.caution_message
                .replace("{threshold}", &self.caution_threshold.to_string())
        })
    }
}

/// Upload reception rules
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct UploadConfig {
    /// Accepted filename extensions, compared case-insensitively
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,

    /// Request body limit for uploads and the JSON API
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Where uploads and artifacts are kept on disk (not kept when absent)
    #[serde(default)]
    pub save_dir: Option<PathBuf>,
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["png".to_string(), "jpg".to_string(), "jpeg".to_string()]
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: default_allowed_extensions(),
            max_upload_bytes: default_max_upload_bytes(),
            save_dir: None,
        }
    }
}

/// Result store sizing
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ResultsConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    64
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        k = config.analysis.k,
                        shadow_threshold = config.analysis.shadow_threshold,
                        capacity = config.results.capacity,
                        save_dir = ?config.uploads.save_dir,
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }
}
