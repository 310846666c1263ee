use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::json;
use solar_analysis::Artifact;
use uuid::Uuid;

use crate::error::ApiError;
use crate::server::AppState;
use crate::services::{AnalysisRecord, TemplateService};

/// An HTML error page with its status code
#[derive(Debug)]
pub struct PageError {
    pub status: StatusCode,
    pub html: String,
}

impl PageError {
    /// Render `error` through the error page template
    pub fn render(templates: &TemplateService, error: ApiError) -> Self {
        let status = error.status();
        if status.is_server_error() {
            tracing::error!(error = %error, "Page request failed");
        }
        Self {
            status,
            html: templates.render_error(status.as_u16(), &error.to_string()),
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (self.status, Html(self.html)).into_response()
    }
}

/// Render a page template or turn the failure into an error page
pub(crate) fn render_page(
    state: &AppState,
    name: &str,
    data: &serde_json::Value,
) -> Result<Html<String>, PageError> {
    state
        .templates
        .render(name, data)
        .map(Html)
        .map_err(|e| PageError::render(&state.templates, e.into()))
}

/// Home page
pub async fn handle_home(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let data = json!({
        "analysis_count": state.results.len().await,
    });
    render_page(&state, "home.html", &data)
}

/// Recent analyses, newest first
pub async fn handle_dashboard(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let presentation = &state.config.presentation;
    let analyses: Vec<_> = state
        .results
        .recent(state.results.capacity())
        .await
        .iter()
        .map(|record| {
            let metrics = record.metrics();
            json!({
                "id": record.id.to_string(),
                "filename": record.filename,
                "created_at": record.created_at.timestamp(),
                "avg_brightness": metrics.avg_brightness,
                "solar_potential_score": metrics.solar_potential_score,
                "caution": presentation.caution_for(metrics.solar_potential_score).is_some(),
            })
        })
        .collect();

    let data = json!({
        "analyses": analyses,
        "capacity": state.results.capacity(),
    });
    render_page(&state, "dashboard.html", &data)
}

/// Metrics and images of one analysis
pub async fn handle_results(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Html<String>, PageError> {
    let record = find_record(&state, &id)
        .await
        .ok_or_else(|| PageError::render(&state.templates, ApiError::NotFound))?;

    let data = results_context(&state, &record);
    render_page(&state, "results.html", &data)
}

pub(crate) async fn find_record(
    state: &AppState,
    id: &str,
) -> Option<std::sync::Arc<AnalysisRecord>> {
    let id = Uuid::parse_str(id).ok()?;
    state.results.get(&id).await
}

fn artifact_title(artifact: Artifact) -> &'static str {
    match artifact {
        Artifact::Original => "Original Image",
        Artifact::Segmented => "Segmented Image",
        Artifact::ShadowOverlay => "Shadow Detection",
        Artifact::Edges => "Edge Detection",
    }
}

fn results_context(state: &AppState, record: &AnalysisRecord) -> serde_json::Value {
    let metrics = record.metrics();
    let images: Vec<_> = Artifact::ALL
        .iter()
        .map(|&artifact| {
            json!({
                "title": artifact_title(artifact),
                "url": format!("/results/{}/{}", record.id, artifact.file_name()),
            })
        })
        .collect();

    json!({
        "id": record.id.to_string(),
        "filename": record.filename,
        "created_at": record.created_at.timestamp(),
        "avg_brightness": metrics.avg_brightness,
        "solar_potential_score": metrics.solar_potential_score,
        "caution": state.config.presentation.caution_for(metrics.solar_potential_score),
        "params": {
            "k": record.params.k,
            "shadow_threshold": record.params.shadow_threshold,
            "edge_low": record.params.edge_low,
            "edge_high": record.params.edge_high,
            "bright_low": record.params.bright_low,
        },
        "images": images,
    })
}
