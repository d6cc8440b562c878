// HTTP server composition for the subscription proxy.

use anyhow::Result;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::controller;
use crate::http::{Controller, HttpServer, Middleware};
use crate::middleware;
use crate::proxy::SubscribeProxy;

/// Creates the HTTP server instance with controllers and middlewares.
pub fn make_http_server(
    shutdown_token: CancellationToken,
    cfg: &Config,
    proxy: Arc<SubscribeProxy>,
) -> Result<Arc<HttpServer>> {
    HttpServer::new(
        shutdown_token,
        &cfg.port,
        cfg.request_timeout(),
        controllers(cfg, proxy),
        middlewares(cfg),
    )
}

/// Returns all HTTP controllers for the server.
fn controllers(cfg: &Config, proxy: Arc<SubscribeProxy>) -> Vec<Box<dyn Controller>> {
    vec![
        // Healthcheck probe endpoint
        Box::new(controller::HealthController::new(
            cfg.route(controller::probe::HEALTH_PATH),
        )),
        // Metrics endpoint
        Box::new(controller::PrometheusMetricsController::new(
            cfg.route(controller::metrics::PROMETHEUS_METRICS_PATH),
        )),
        // Main subscription handler and its alias
        Box::new(controller::SubscribeController::new(
            vec![
                cfg.route(controller::subscribe::SUBSCRIBE_PATH),
                cfg.route(controller::subscribe::SUBSCRIBE_GET_PATH),
            ],
            proxy,
        )),
    ]
}

/// Returns middlewares, outermost first.
fn middlewares(cfg: &Config) -> Vec<Box<dyn Middleware>> {
    vec![
        Box::new(middleware::TraceMiddleware::new()),
        Box::new(middleware::CorsMiddleware::new(cfg.cors_origins())),
    ]
}
