// Package api provides the health endpoint.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::http::Controller;

pub const HEALTH_PATH: &str = "/health";

/// Answers `ok` while the process is serving requests.
pub struct HealthController {
    path: String,
}

impl HealthController {
    /// Creates a health controller answering on `path`.
    pub fn new(path: String) -> Self {
        Self { path }
    }

    async fn health() -> impl IntoResponse {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            "ok",
        )
    }
}

impl Controller for HealthController {
    fn add_route(&self, router: Router) -> Router {
        router.route(&self.path, get(Self::health))
    }
}
