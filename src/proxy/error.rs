use axum::http::StatusCode;

use crate::access::AuthError;
use crate::singleflight::FetchError;

/// Outcome of a subscribe request that did not produce a document.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("access denied: {0}")]
    Denied(#[from] AuthError),
    #[error("subscription unavailable: {0}")]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    /// Response status for this error. Details stay in the logs.
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::Denied(_) => StatusCode::FORBIDDEN,
            ProxyError::Fetch(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
