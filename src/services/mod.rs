pub mod analysis_service;
pub mod archive;
pub mod result_store;
pub mod template_service;

pub use analysis_service::AnalysisService;
pub use archive::{archive_upload, write_artifacts};
pub use result_store::{AnalysisRecord, ResultStore};
pub use template_service::{TemplateError, TemplateService};
