//! HTTP server implementation.
//

use anyhow::{Context, Result};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::controller::controller::Controller;
use crate::middleware::middleware::Middleware;

/// Server trait for HTTP server operations.
#[async_trait::async_trait]
pub trait Server: Send + Sync {
    /// Starts the server (blocking).
    async fn listen_and_serve(&self) -> Result<()>;
}

/// HTTP server implementation.
pub struct HttpServer {
    shutdown_token: CancellationToken,
    port: String,
    router: Router,
}

impl HttpServer {
    /// Creates a new HTTP server.
    pub fn new(
        shutdown_token: CancellationToken,
        port: &str,
        request_timeout: Duration,
        controllers: Vec<Box<dyn Controller>>,
        middlewares: Vec<Box<dyn Middleware>>,
    ) -> Result<Arc<Self>> {
        let router = Self::build_router(controllers);
        let router = Self::merge_middlewares(router, middlewares, request_timeout);

        Ok(Arc::new(Self {
            shutdown_token,
            port: port.trim_start_matches(':').to_string(),
            router,
        }))
    }

    /// Returns the composed router, mainly for in-process tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Binds the configured port on all interfaces.
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr: SocketAddr = format!("0.0.0.0:{}", self.port)
            .parse()
            .context("failed to parse server address")?;

        TcpListener::bind(&addr)
            .await
            .with_context(|| format!("failed to bind tcp listener on {}", addr))
    }

    /// Serves on an already bound listener until the shutdown token fires.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        let local_addr = listener.local_addr().ok();
        info!(
            component = "server",
            event = "started",
            addr = ?local_addr,
            "server started"
        );

        let shutdown_token = self.shutdown_token.clone();
        let serve_future =
            axum::serve(listener, self.router.clone()).with_graceful_shutdown(async move {
                shutdown_token.cancelled().await;
            });

        if let Err(e) = serve_future.await {
            error!(
                component = "server",
                event = "listen_and_serve_failed",
                addr = ?local_addr,
                error = %e,
                "server failed to listen and serve"
            );
            return Err(e.into());
        }

        info!(
            component = "server",
            event = "stopped",
            addr = ?local_addr,
            "server stopped"
        );

        Ok(())
    }

    /// Builds the router with all controllers.
    fn build_router(controllers: Vec<Box<dyn Controller>>) -> Router {
        controllers
            .iter()
            .fold(Router::new(), |router, controller| controller.add_route(router))
    }

    /// Merges middlewares into the router.
    fn merge_middlewares(
        router: Router,
        middlewares: Vec<Box<dyn Middleware>>,
        request_timeout: Duration,
    ) -> Router {
        // Apply middlewares in reverse order (last middleware wraps first)
        let router = middlewares
            .iter()
            .rev()
            .fold(router, |router, middleware| middleware.apply(router));

        router.layer(tower_http::timeout::TimeoutLayer::new(request_timeout))
    }
}

#[async_trait::async_trait]
impl Server for HttpServer {
    async fn listen_and_serve(&self) -> Result<()> {
        let listener = self.bind().await?;
        self.serve(listener).await
    }
}
