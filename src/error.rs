use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use solar_analysis::AnalysisError;
use thiserror::Error;

use crate::services::TemplateError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("File type not allowed: {0}")]
    UnsupportedFileType(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found")]
    NotFound,

    #[error("Upload exceeds {max} bytes")]
    PayloadTooLarge { max: usize },

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error("Analysis timed out after {0} seconds")]
    Timeout(u64),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::UnsupportedFileType(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Analysis(AnalysisError::InvalidParameter { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Analysis(e) if e.is_input_error() => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Analysis(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            ApiError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Errors from the example chart renderer.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("SVG parse error: {0}")]
    SvgParse(String),

    #[error("Failed to allocate pixmap")]
    PixmapAllocation,

    #[error("PNG encode error: {0}")]
    PngEncode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = Json(json!({
            "status": status.as_u16(),
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
