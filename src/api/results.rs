use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use solar_analysis::Artifact;

use super::pages::find_record;
use crate::error::ApiError;
use crate::server::AppState;

/// Get one artifact PNG of an analysis
#[utoipa::path(
    get,
    path = "/results/{id}/{artifact}",
    responses(
        (status = 200, description = "PNG image", content_type = "image/png"),
        (status = 404, description = "Unknown analysis or artifact"),
    ),
    params(
        ("id" = String, Path, description = "Analysis id"),
        ("artifact" = String, Path, description = "original.png, segmented.png, shadow.png or edges.png"),
    ),
    tag = "Results"
)]
pub async fn handle_artifact(
    State(state): State<AppState>,
    Path((id, artifact)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let artifact = Artifact::from_file_name(&artifact).ok_or(ApiError::NotFound)?;
    let record = find_record(&state, &id).await.ok_or(ApiError::NotFound)?;

    let png = record.artifact(artifact).to_vec();
    tracing::debug!(%id, artifact = artifact.file_name(), size_bytes = png.len(), "Serving artifact");

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "private, max-age=3600"),
        ],
        png,
    )
        .into_response())
}
