use axum::Router;
use tower_http::trace::TraceLayer;

use super::middleware::Middleware;

/// Emits a tracing span and response event for every request.
#[derive(Debug, Default)]
pub struct TraceMiddleware;

impl TraceMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Middleware for TraceMiddleware {
    fn apply(&self, router: Router) -> Router {
        router.layer(TraceLayer::new_for_http())
    }
}
