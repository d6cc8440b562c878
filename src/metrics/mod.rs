//! Prometheus metrics functionality.
//
//! Metrics organization:
//! - Request and cache fill counters: meter (invalid_token_requests_total, cache_update_requests_total, etc.)
//! - Recorder installation and text rendering: exporter

pub mod exporter;
pub mod meter;


// Re-export commonly used items
pub use exporter::{init_prometheus_exporter, scrape_prometheus_text};
pub use meter::{Meter, PrometheusMeter};
