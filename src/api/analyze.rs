use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::Json,
};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};
use solar_analysis::{AnalysisOutput, AnalysisParams};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;
use crate::models::secure_filename;
use crate::server::AppState;
use crate::services::AnalysisRecord;

/// Optional overrides of the configured analysis parameters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AnalyzeQuery {
    /// Number of color clusters
    pub k: Option<usize>,
    /// Gray levels at or below this are shadow
    pub shadow_threshold: Option<u8>,
    /// Lower edge hysteresis threshold
    pub edge_low: Option<u32>,
    /// Upper edge hysteresis threshold
    pub edge_high: Option<u32>,
    /// Gray levels at or above this are bright
    pub bright_low: Option<u8>,
    /// Seed for reproducible clustering
    pub seed: Option<u64>,
    /// Name to record for the upload
    pub filename: Option<String>,
}

impl AnalyzeQuery {
    fn apply(&self, defaults: AnalysisParams) -> AnalysisParams {
        AnalysisParams {
            k: self.k.unwrap_or(defaults.k),
            shadow_threshold: self.shadow_threshold.unwrap_or(defaults.shadow_threshold),
            edge_low: self.edge_low.unwrap_or(defaults.edge_low),
            edge_high: self.edge_high.unwrap_or(defaults.edge_high),
            bright_low: self.bright_low.unwrap_or(defaults.bright_low),
            seed: self.seed.or(defaults.seed),
        }
    }
}

/// Base64-encoded PNG artifacts
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeImages {
    pub original: String,
    pub segmented: String,
    pub shadow_overlay: String,
    pub edges: String,
}

impl AnalyzeImages {
    fn encode(output: &AnalysisOutput) -> Self {
        Self {
            original: STANDARD.encode(&output.original),
            segmented: STANDARD.encode(&output.segmented),
            shadow_overlay: STANDARD.encode(&output.shadow_overlay),
            edges: STANDARD.encode(&output.edges),
        }
    }
}

/// Analysis result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AnalyzeResponse {
    /// Analysis id, also usable under /results/{id}
    pub id: String,
    pub avg_brightness: f64,
    pub solar_potential_score: f64,
    /// Present when the score exceeds the caution threshold
    pub caution: Option<String>,
    pub images: AnalyzeImages,
}

/// Analyze a rooftop image
///
/// The request body is the raw PNG or JPEG file. Query parameters override
/// the configured analysis parameters.
#[utoipa::path(
    post,
    path = "/api/analyze",
    request_body(content = Vec<u8>, description = "PNG or JPEG image", content_type = "application/octet-stream"),
    params(AnalyzeQuery),
    responses(
        (status = 200, description = "Analysis finished", body = AnalyzeResponse),
        (status = 400, description = "Empty body or invalid parameters"),
        (status = 413, description = "Image too large"),
        (status = 422, description = "Body is not a readable image"),
        (status = 504, description = "Analysis timed out"),
    ),
    tag = "Analysis"
)]
pub async fn handle_analyze(
    State(state): State<AppState>,
    query: Result<Query<AnalyzeQuery>, QueryRejection>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let body = body.map_err(|e| {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge {
                max: state.config.uploads.max_upload_bytes,
            }
        } else {
            ApiError::BadRequest(e.body_text())
        }
    })?;
    if body.is_empty() {
        return Err(ApiError::BadRequest("Request body is empty".to_string()));
    }

    let params = query.apply(state.analysis.defaults());
    let output = state.analysis.analyze(body.to_vec(), params).await?;

    let filename = secure_filename(query.filename.as_deref().unwrap_or("upload"));
    let record = state
        .results
        .insert(AnalysisRecord::new(filename, params, output))
        .await;

    let metrics = record.metrics();
    Ok(Json(AnalyzeResponse {
        id: record.id.to_string(),
        avg_brightness: metrics.avg_brightness,
        solar_potential_score: metrics.solar_potential_score,
        caution: state
            .config
            .presentation
            .caution_for(metrics.solar_potential_score),
        images: AnalyzeImages::encode(&record.output),
    }))
}
