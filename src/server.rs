//! HTTP server setup and configuration.
//!
//! This module provides the router and application state used by both
//! the production server and integration tests.

use axum::{
    extract::DefaultBodyLimit,
    http::{header::X_CONTENT_TYPE_OPTIONS, HeaderValue},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{set_header::SetResponseHeaderLayer, trace::TraceLayer};

use crate::api;
use crate::assets::AssetLoader;
use crate::models::AppConfig;
use crate::services::{AnalysisService, ResultStore, TemplateService};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analysis: Arc<AnalysisService>,
    pub results: Arc<ResultStore>,
    pub templates: Arc<TemplateService>,
}

/// Create application state from an asset loader.
pub fn create_app_state(asset_loader: Arc<AssetLoader>) -> anyhow::Result<AppState> {
    let config = AppConfig::load_from_assets(&asset_loader);
    create_app_state_with_config(asset_loader, config)
}

/// Create application state with an explicit configuration.
pub fn create_app_state_with_config(
    asset_loader: Arc<AssetLoader>,
    config: AppConfig,
) -> anyhow::Result<AppState> {
    let analysis = Arc::new(AnalysisService::new(&config.analysis));
    let results = Arc::new(ResultStore::new(config.results.capacity));
    let templates = Arc::new(
        TemplateService::new(asset_loader)
            .map_err(|e| anyhow::anyhow!("Failed to load templates: {e}"))?,
    );

    Ok(AppState {
        config: Arc::new(config),
        analysis,
        results,
        templates,
    })
}

/// Build the router with all pages, endpoints and middleware.
///
/// This is the core router used by both production and tests.
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.uploads.max_upload_bytes;

    Router::new()
        // Pages
        .route("/", get(api::handle_home))
        .route("/upload", get(api::handle_upload_form).post(api::handle_upload))
        .route("/dashboard", get(api::handle_dashboard))
        .route("/results/:id", get(api::handle_results))
        .route("/results/:id/:artifact", get(api::handle_artifact))
        // JSON API
        .route("/api/analyze", post(api::handle_analyze))
        // Health check
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
}
