// Test upstream server for integration tests.

use axum::{
    extract::Request,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

/// How the upstream answers one path.
#[derive(Debug, Clone)]
pub struct Behavior {
    pub status: u16,
    pub delay: Duration,
    /// Body override; the default body names the requested path.
    pub body: Option<Vec<u8>>,
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            status: 200,
            delay: Duration::ZERO,
            body: None,
        }
    }
}

impl Behavior {
    pub fn status(status: u16) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn delayed(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn body(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }
}

#[derive(Default)]
struct State {
    behaviors: Mutex<HashMap<String, Behavior>>,
    hits: Mutex<HashMap<String, usize>>,
    last_headers: Mutex<HashMap<String, HeaderMap>>,
}

/// Body served for `path` when no override is configured.
pub fn default_body(path: &str) -> String {
    format!("proxies: {}\n", path)
}

/// Upstream test server.
pub struct UpstreamServer {
    addr: String,
    state: Arc<State>,
    handle: JoinHandle<()>,
    shutdown: tokio::sync::oneshot::Sender<()>,
}

impl UpstreamServer {
    /// Starts the upstream server on an ephemeral port.
    pub async fn start() -> Self {
        let state = Arc::new(State::default());
        let state_for_handler = state.clone();

        let handler = move |req: Request| {
            let state = state_for_handler.clone();
            async move { Self::respond(state, req).await }
        };

        let router = Router::new()
            .route("/healthcheck", get(|| async { "ok" }))
            .fallback(handler);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("127.0.0.1:{}", addr.port());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            let server = axum::serve(listener, router);
            tokio::select! {
                _ = server => {},
                _ = shutdown_rx => {},
            }
        });

        wait_http_ready(&format!("http://{}/healthcheck", addr_str)).await;

        Self {
            addr: addr_str,
            state,
            handle,
            shutdown: shutdown_tx,
        }
    }

    async fn respond(state: Arc<State>, req: Request) -> Response {
        let path = req.uri().path().to_string();

        *state.hits.lock().unwrap().entry(path.clone()).or_insert(0) += 1;
        state
            .last_headers
            .lock()
            .unwrap()
            .insert(path.clone(), req.headers().clone());

        let behavior = state
            .behaviors
            .lock()
            .unwrap()
            .get(&path)
            .cloned()
            .unwrap_or_default();

        if !behavior.delay.is_zero() {
            tokio::time::sleep(behavior.delay).await;
        }

        let status = StatusCode::from_u16(behavior.status).unwrap();
        let body = behavior
            .body
            .unwrap_or_else(|| default_body(&path).into_bytes());

        let mut headers = HeaderMap::new();
        headers.insert("content-type", "text/yaml; charset=utf-8".parse().unwrap());
        headers.insert(
            "subscription-userinfo",
            "upload=1; download=2; total=3".parse().unwrap(),
        );
        headers.insert(
            "content-disposition",
            format!("attachment; filename={}", path.trim_start_matches('/'))
                .parse()
                .unwrap(),
        );
        headers.insert("x-upstream-secret", "hidden".parse().unwrap());

        (status, headers, body).into_response()
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Base URL subscriptions are configured under.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Replaces the behavior for `path` (e.g. "/a").
    pub fn set(&self, path: &str, behavior: Behavior) {
        self.state
            .behaviors
            .lock()
            .unwrap()
            .insert(path.to_string(), behavior);
    }

    /// Number of requests received for `path`.
    pub fn hits(&self, path: &str) -> usize {
        *self.state.hits.lock().unwrap().get(path).unwrap_or(&0)
    }

    /// Total number of subscription requests received.
    pub fn total_hits(&self) -> usize {
        self.state.hits.lock().unwrap().values().sum()
    }

    /// Value of header `name` on the last request for `path`.
    pub fn last_header(&self, path: &str, name: &str) -> Option<String> {
        self.state
            .last_headers
            .lock()
            .unwrap()
            .get(path)
            .and_then(|h| h.get(name))
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    }

    /// Closes the upstream server.
    pub async fn close(self) {
        let _ = self.shutdown.send(());
        self.handle.abort();
    }
}

/// Waits for HTTP server to be ready.
async fn wait_http_ready(url: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
    while tokio::time::Instant::now() < deadline {
        if let Ok(resp) = reqwest::get(url).await {
            if resp.status().is_success() {
                return;
            }
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    panic!("http not ready: {}", url);
}
