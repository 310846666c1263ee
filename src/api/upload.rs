use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde_json::json;

use super::pages::{render_page, PageError};
use crate::error::ApiError;
use crate::models::{allowed_file, secure_filename};
use crate::server::AppState;
use crate::services::{archive_upload, AnalysisRecord};

/// Multipart field carrying the image
const FILE_FIELD: &str = "file";

/// Upload form
pub async fn handle_upload_form(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    render_page(&state, "upload.html", &form_context(&state, None))
}

fn form_context(state: &AppState, error: Option<&str>) -> serde_json::Value {
    let uploads = &state.config.uploads;
    json!({
        "error": error,
        "allowed_extensions": uploads.allowed_extensions,
        "accept": uploads
            .allowed_extensions
            .iter()
            .map(|ext| format!(".{ext}"))
            .collect::<Vec<_>>()
            .join(","),
        "max_upload_mb": uploads.max_upload_bytes as f64 / (1024.0 * 1024.0),
    })
}

/// Receive an uploaded image, analyze it and redirect to its results page
pub async fn handle_upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Response, PageError> {
    let page_error = |e: ApiError| PageError::render(&state.templates, e);

    let Some((filename, data)) = read_file_field(multipart, state.config.uploads.max_upload_bytes)
        .await
        .map_err(page_error)?
    else {
        tracing::debug!("Upload without file part");
        return Ok(Redirect::to("/upload").into_response());
    };

    if filename.is_empty() {
        tracing::debug!("Upload without file name");
        return Ok(Redirect::to("/upload").into_response());
    }

    if !allowed_file(&filename, &state.config.uploads.allowed_extensions) {
        tracing::info!(filename = %filename, "Rejected upload with disallowed extension");
        let message = ApiError::UnsupportedFileType(filename).to_string();
        let html = render_page(&state, "upload.html", &form_context(&state, Some(&message)))?;
        return Ok((StatusCode::BAD_REQUEST, html).into_response());
    }

    let params = state.analysis.defaults();
    let output = state
        .analysis
        .analyze(data.to_vec(), params)
        .await
        .map_err(page_error)?;

    let record = AnalysisRecord::new(secure_filename(&filename), params, output);

    if let Some(save_dir) = state.config.uploads.save_dir.clone() {
        let id = record.id;
        let name = record.filename.clone();
        let output = record.output.clone();
        tokio::task::spawn_blocking(move || archive_upload(&save_dir, id, &name, &data, &output))
            .await
            .map_err(|e| page_error(ApiError::Internal(format!("Archive task failed: {e}"))))?
            .map_err(|e| page_error(ApiError::Internal(format!("Failed to save upload: {e}"))))?;
    }

    let record = state.results.insert(record).await;
    tracing::info!(
        id = %record.id,
        filename = %record.filename,
        score = record.metrics().solar_potential_score,
        "Upload analyzed"
    );

    Ok(Redirect::to(&format!("/results/{}", record.id)).into_response())
}

/// Find the file field; `None` when the form has no such part
async fn read_file_field(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<Option<(String, Bytes)>, ApiError> {
    let to_api_error = |e: MultipartError| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { max: max_bytes }
        } else {
            ApiError::BadRequest(e.body_text())
        }
    };

    while let Some(field) = multipart.next_field().await.map_err(to_api_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(to_api_error)?;
        return Ok(Some((filename, data)));
    }
    Ok(None)
}
