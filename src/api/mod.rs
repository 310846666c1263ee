pub mod analyze;
pub mod pages;
pub mod results;
pub mod upload;

pub use analyze::{handle_analyze, AnalyzeImages, AnalyzeQuery, AnalyzeResponse, __path_handle_analyze};
pub use pages::{handle_dashboard, handle_home, handle_results, PageError};
pub use results::{handle_artifact, __path_handle_artifact};
pub use upload::{handle_upload, handle_upload_form};
