use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::backend_hyper_impl::make_get_request;
use super::{Response, Upstream, UpstreamError};
use crate::config::{Config, RequestHeader};
use crate::http::client::{create_client, HyperClient};

/// Backend implementation for upstream requests.
pub struct BackendImpl {
    client: HyperClient,
    timeout: Duration,
    max_body_size: usize,
}

impl BackendImpl {
    /// Creates a new backend with the configured deadline and body cap.
    pub fn new(cfg: &Config) -> Arc<Self> {
        Arc::new(Self {
            client: create_client(),
            timeout: cfg.upstream_timeout(),
            max_body_size: cfg.max_body_size(),
        })
    }
}

#[async_trait]
impl Upstream for BackendImpl {
    async fn fetch(&self, url: &str, headers: &[RequestHeader]) -> Result<Response, UpstreamError> {
        info!(
            component = "upstream",
            event = "request",
            url = %url,
            "requesting upstream subscription"
        );

        let result = make_get_request(
            &self.client,
            url,
            headers,
            self.timeout,
            self.max_body_size,
        )
        .await;

        match result {
            Ok((status, response_headers, body)) => {
                info!(
                    component = "upstream",
                    event = "response",
                    url = %url,
                    status = status,
                    bytes = body.len(),
                    "upstream responded"
                );

                let headers = response_headers
                    .iter()
                    .map(|(name, value)| {
                        (
                            name.as_str().to_string(),
                            String::from_utf8_lossy(value.as_bytes()).into_owned(),
                        )
                    })
                    .collect();

                Ok(Response::new(status, headers, body))
            }
            Err(e) => {
                warn!(
                    component = "upstream",
                    event = "failed",
                    url = %url,
                    status = ?e.status(),
                    error = %e,
                    "upstream fetch failed"
                );
                Err(e)
            }
        }
    }
}
