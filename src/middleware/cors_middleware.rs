//! Cross-origin access for browser dashboards.

use axum::http::{HeaderValue, Method};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::{info, warn};

use super::middleware::Middleware;

const ANY_ORIGIN: &str = "*";

/// Answers CORS preflights and decorates GET responses for the configured origins.
///
/// An empty origin list disables the layer entirely; `*` allows any origin.
pub struct CorsMiddleware {
    origins: Vec<String>,
}

impl CorsMiddleware {
    pub fn new(origins: Vec<String>) -> Self {
        Self { origins }
    }

    /// Builds the layer, or `None` when no origin is configured.
    pub fn layer(&self) -> Option<CorsLayer> {
        if self.origins.is_empty() {
            return None;
        }

        let cors = CorsLayer::new().allow_methods([Method::GET, Method::OPTIONS]);

        if self.origins.iter().any(|o| o == ANY_ORIGIN) {
            info!(component = "cors", event = "configured", "allowing any origin");
            return Some(cors.allow_origin(Any));
        }

        let origins: Vec<HeaderValue> = self
            .origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(
                        component = "cors",
                        event = "invalid_origin",
                        origin = %origin,
                        "skipping origin that is not a valid header value"
                    );
                    None
                }
            })
            .collect();

        info!(
            component = "cors",
            event = "configured",
            origins = ?self.origins,
            "allowing configured origins"
        );
        Some(cors.allow_origin(AllowOrigin::list(origins)))
    }
}

impl Middleware for CorsMiddleware {
    fn apply(&self, router: Router) -> Router {
        match self.layer() {
            Some(layer) => router.layer(layer),
            None => router,
        }
    }
}
