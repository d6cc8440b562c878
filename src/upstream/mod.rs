//! Upstream fetching of subscription documents.

pub mod backend;
mod backend_hyper_impl;
pub mod error;
pub mod upstream;

#[cfg(test)]
mod backend_hyper_impl_test;

// Re-export main types
pub use backend::BackendImpl;
pub use error::UpstreamError;
pub use upstream::{Response, Upstream};
