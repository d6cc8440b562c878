#[cfg(test)]
mod tests;

#[cfg(test)]
pub use tests::support;

pub mod access;
pub mod app;
pub mod config;
pub mod controller;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod proxy;
pub mod shutdown;
pub mod singleflight;
pub mod storage;
pub mod upstream;
