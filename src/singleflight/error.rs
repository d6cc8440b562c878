use std::io;
use std::sync::Arc;
use std::time::Duration;

use crate::upstream::UpstreamError;

/// Failure to obtain a fresh record after a valid authorization.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
    #[error("cache i/o failed: {0}")]
    Io(#[from] io::Error),
    /// Failure of a fill round. Its owner and every waiter of the round
    /// observe the same error.
    #[error("cache fill failed: {0}")]
    Fill(Arc<FetchError>),
    #[error("fill completed without leaving a fresh cache record")]
    MissAfterFill,
    #[error("timed out after {0:?} waiting for a concurrent fill")]
    WaitTimeout(Duration),
    #[error("fill was abandoned before completing")]
    Abandoned,
}

impl FetchError {
    /// The error that failed the round, with `Fill` wrappers removed.
    pub fn root(&self) -> &FetchError {
        match self {
            FetchError::Fill(inner) => inner.root(),
            other => other,
        }
    }
}
