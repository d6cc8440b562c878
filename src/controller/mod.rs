// HTTP API controllers.

pub mod controller;
pub mod metrics;
pub mod probe;
pub mod subscribe;

#[cfg(test)]
mod subscribe_test;

// Re-export controller types for convenience
pub use metrics::PrometheusMetricsController;
pub use probe::HealthController;
pub use subscribe::SubscribeController;
