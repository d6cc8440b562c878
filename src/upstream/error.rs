//! Upstream fetch errors.

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("invalid upstream request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },
    #[error("upstream request to {url} failed: {reason}")]
    Transport { url: String, reason: String },
    #[error("upstream request to {url} timed out after {timeout:?}")]
    Timeout { url: String, timeout: Duration },
    #[error("upstream {url} responded with status {status}")]
    Status { url: String, status: u16 },
    #[error("upstream {url} body exceeds {limit} bytes")]
    BodyTooLarge { url: String, limit: usize },
}

impl UpstreamError {
    /// Status code of a well-formed but rejected response.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
