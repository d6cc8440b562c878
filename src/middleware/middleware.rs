// Package http provides Middleware interface.

use axum::Router;

/// Wraps the composed router with a cross-cutting layer.
pub trait Middleware: Send + Sync {
    /// Applies the middleware to the router.
    fn apply(&self, router: Router) -> Router;
}
