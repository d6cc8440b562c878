// Main application implementation.

use anyhow::Result;
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::http::{HttpServer, Server};
use crate::metrics::{Meter, PrometheusMeter};
use crate::proxy::SubscribeProxy;
use crate::singleflight::FetchCoordinator;
use crate::storage::CacheStore;
use crate::upstream::{self, Upstream};

use super::server::make_http_server;

/// Encapsulates the whole application state.
pub struct App {
    cfg: Arc<Config>,
    server: Arc<HttpServer>,
}

impl App {
    /// Creates the application with the hyper upstream backend and Prometheus counters.
    pub fn new(shutdown_token: CancellationToken, cfg: Config) -> Result<Self> {
        let backend = upstream::BackendImpl::new(&cfg);
        Self::with_components(shutdown_token, cfg, backend, Arc::new(PrometheusMeter::new()))
    }

    /// Creates the application around the given upstream and meter.
    pub fn with_components(
        shutdown_token: CancellationToken,
        cfg: Config,
        backend: Arc<dyn Upstream>,
        meter: Arc<dyn Meter>,
    ) -> Result<Self> {
        let cfg = Arc::new(cfg);

        let store = Arc::new(CacheStore::new(cfg.cache_dir.clone()));
        let coordinator = Arc::new(FetchCoordinator::new(store, cfg.wait_timeout()));
        let proxy = Arc::new(SubscribeProxy::new(
            cfg.clone(),
            coordinator,
            backend,
            meter,
        ));
        let server = make_http_server(shutdown_token, &cfg, proxy)?;

        info!(
            component = "app",
            event = "initialized",
            users = cfg.users.len(),
            subscribe_groups = cfg.subscribe_groups.len(),
            cache_dir = ?cfg.cache_dir,
            context_path = %cfg.context_path,
            "application initialized"
        );

        Ok(Self { cfg, server })
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Composed router with every route and middleware.
    pub fn router(&self) -> Router {
        self.server.router()
    }

    /// Binds the configured port.
    pub async fn bind(&self) -> Result<TcpListener> {
        self.server.bind().await
    }

    /// Serves on `listener` until the shutdown token is cancelled.
    pub async fn serve(&self, listener: TcpListener) -> Result<()> {
        self.server.serve(listener).await?;
        info!(component = "app", event = "stopped", "application lifecycle");
        Ok(())
    }

    /// Binds the configured port and serves until the shutdown token is cancelled.
    pub async fn listen_and_serve(&self) -> Result<()> {
        info!(component = "app", event = "started", port = %self.cfg.port, "application lifecycle");
        self.server.listen_and_serve().await
    }
}
