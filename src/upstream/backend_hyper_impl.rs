//! Hyper-based implementation of the upstream GET.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper::{Method, Request, StatusCode, Uri};
use std::time::Duration;
use tokio::time::timeout;

use super::error::UpstreamError;
use crate::config::RequestHeader;
use crate::http::client::HyperClient;

/// Makes a GET request and collects a `200 OK` body of at most `max_body_size` bytes.
pub async fn make_get_request(
    client: &HyperClient,
    url: &str,
    headers: &[RequestHeader],
    timeout_duration: Duration,
    max_body_size: usize,
) -> Result<(u16, hyper::HeaderMap, Bytes), UpstreamError> {
    let invalid = |reason: String| UpstreamError::InvalidRequest {
        url: url.to_string(),
        reason,
    };

    let uri = Uri::try_from(url).map_err(|e| invalid(e.to_string()))?;

    let mut builder = Request::builder().method(Method::GET).uri(uri);
    for header in headers {
        builder = builder.header(header.name.as_str(), header.value.as_str());
    }

    let empty: BoxBody<Bytes, hyper::Error> = Empty::<Bytes>::new()
        .map_err(|never: std::convert::Infallible| match never {})
        .boxed();
    let req = builder.body(empty).map_err(|e| invalid(e.to_string()))?;

    // The deadline covers the whole exchange, body included.
    let exchange = async {
        let response = client.request(req).await.map_err(|e| {
            tracing::error!(
                component = "upstream",
                url = %url,
                error = %e,
                error_debug = ?e,
                "hyper client request failed"
            );
            UpstreamError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let (parts, body) = response.into_parts();
        let body = Limited::new(body, max_body_size)
            .collect()
            .await
            .map_err(|e| {
                if e.downcast_ref::<LengthLimitError>().is_some() {
                    UpstreamError::BodyTooLarge {
                        url: url.to_string(),
                        limit: max_body_size,
                    }
                } else {
                    UpstreamError::Transport {
                        url: url.to_string(),
                        reason: format!("failed to read response body: {}", e),
                    }
                }
            })?
            .to_bytes();

        Ok::<_, UpstreamError>((status.as_u16(), parts.headers, body))
    };

    match timeout(timeout_duration, exchange).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(
                component = "upstream",
                url = %url,
                timeout = ?timeout_duration,
                "request timed out"
            );
            Err(UpstreamError::Timeout {
                url: url.to_string(),
                timeout: timeout_duration,
            })
        }
    }
}
