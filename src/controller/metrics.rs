//! Metrics controller.

use axum::{
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};

use crate::http::Controller;
use crate::metrics::scrape_prometheus_text;

pub const PROMETHEUS_METRICS_PATH: &str = "/metrics";

/// Exposes the recorded counters in the Prometheus text format.
pub struct PrometheusMetricsController {
    path: String,
}

impl PrometheusMetricsController {
    /// Creates a metrics controller answering on `path`.
    pub fn new(path: String) -> Self {
        Self { path }
    }

    async fn get_metrics() -> impl IntoResponse {
        // Nothing recorded yet when the exporter was not installed.
        let text = scrape_prometheus_text().unwrap_or_default();
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            text,
        )
    }
}

impl Controller for PrometheusMetricsController {
    fn add_route(&self, router: Router) -> Router {
        router.route(&self.path, get(Self::get_metrics))
    }
}
