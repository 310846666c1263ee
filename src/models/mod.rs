pub mod config;
pub mod upload;

pub use config::{AnalysisConfig, AppConfig, PresentationConfig, ResultsConfig, UploadConfig};
pub use upload::{allowed_file, secure_filename};
