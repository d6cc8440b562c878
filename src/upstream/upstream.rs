// Package upstream provides the outbound fetch interface.

use bytes::Bytes;

use super::error::UpstreamError;
use crate::config::RequestHeader;

/// Upstream defines the interface for fetching subscription documents.
#[async_trait::async_trait]
pub trait Upstream: Send + Sync {
    /// Issues a single GET to `url` with `headers` set.
    ///
    /// Only a `200 OK` response is a success; any other status is
    /// reported as [`UpstreamError::Status`] and its body is dropped.
    async fn fetch(&self, url: &str, headers: &[RequestHeader]) -> Result<Response, UpstreamError>;
}

/// Successful upstream response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: Vec<(String, String)>, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }
}
