//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use solarscope::assets::AssetLoader;
use solarscope::models::AppConfig;
use solarscope::server::{build_router, create_app_state, create_app_state_with_config};
use solarscope::services::ResultStore;

/// Boundary used for hand-built multipart bodies
pub const BOUNDARY: &str = "solarscope-test-boundary";

/// Test application with router and direct access to services
pub struct TestApp {
    router: axum::Router,
    pub results: Arc<ResultStore>,
}

impl TestApp {
    /// Create a new test application using embedded assets
    pub fn new() -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state = create_app_state(asset_loader).expect("Failed to create app state");
        let results = state.results.clone();
        Self {
            router: build_router(state),
            results,
        }
    }

    /// Create a test application with a custom configuration
    pub fn with_config(config: AppConfig) -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state = create_app_state_with_config(asset_loader, config)
            .expect("Failed to create app state");
        let results = state.results.clone();
        Self {
            router: build_router(state),
            results,
        }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST a multipart form with a single file part
    pub async fn post_file(&self, path: &str, field: &str, filename: &str, data: &[u8]) -> TestResponse {
        let body = multipart_body(&[Part::File {
            field,
            filename,
            data,
        }]);
        self.post_multipart(path, body).await
    }

    /// POST a prebuilt multipart body
    pub async fn post_multipart(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header(
                "Content-Type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.request(request).await
    }

    /// POST raw bytes
    pub async fn post_bytes(&self, path: &str, data: Vec<u8>) -> TestResponse {
        let request = Request::post(path)
            .header("Content-Type", "application/octet-stream")
            .body(Body::from(data))
            .unwrap();
        self.request(request).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// One multipart form part
pub enum Part<'a> {
    File {
        field: &'a str,
        filename: &'a str,
        data: &'a [u8],
    },
    Text {
        field: &'a str,
        value: &'a str,
    },
}

/// Build a multipart/form-data body using [`BOUNDARY`]
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File {
                field,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
            Part::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}")
                        .as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Value of a response header
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }
}
