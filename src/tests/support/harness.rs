// Proxy server bootstrap for integration tests.

use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::upstream::UpstreamServer;
use crate::app::App;
use crate::config::{self, Config};
use crate::metrics::{self, PrometheusMeter};
use crate::model::CacheKey;
use crate::upstream::BackendImpl;

/// A running proxy with its own cache directory, pointed at a test upstream.
pub struct ProxyServer {
    base: String,
    cache_dir: tempfile::TempDir,
    shutdown_token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ProxyServer {
    /// Starts the proxy with the stock test configuration.
    pub async fn start(upstream: &UpstreamServer) -> Self {
        Self::start_with(upstream, |_| {}).await
    }

    /// Starts the proxy after letting `tweak` adjust the test configuration.
    pub async fn start_with(upstream: &UpstreamServer, tweak: impl FnOnce(&mut Config)) -> Self {
        metrics::init_prometheus_exporter().unwrap();

        let cache_dir = tempfile::tempdir().unwrap();
        let mut cfg = config::new_test_config(cache_dir.path(), &upstream.base_url());
        tweak(&mut cfg);
        let cfg = cfg.prepare().unwrap();
        let context_path = cfg.context_path.clone();

        let shutdown_token = CancellationToken::new();
        let backend = BackendImpl::new(&cfg);
        let app = App::with_components(
            shutdown_token.clone(),
            cfg,
            backend,
            Arc::new(PrometheusMeter::new()),
        )
        .unwrap();

        let listener = app.bind().await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = tokio::spawn(async move {
            if let Err(e) = app.serve(listener).await {
                eprintln!("[proxy] serve failed: {}", e);
            }
        });

        Self {
            base: format!("http://127.0.0.1:{}{}", port, context_path),
            cache_dir,
            shutdown_token,
            handle,
        }
    }

    /// Absolute URL of `path_and_query` under the context path.
    pub fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    /// Cache file of the (group, subscribe) pair.
    pub fn cache_file(&self, group: &str, subscribe: &str) -> PathBuf {
        self.cache_dir
            .path()
            .join(CacheKey::new(group, subscribe).file_name())
    }

    /// Stops the proxy server.
    pub async fn stop(self) {
        self.shutdown_token.cancel();
        let _ = self.handle.await;
    }
}
