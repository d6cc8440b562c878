//! Subscribe request orchestration: access, cache, fill and projection.

pub mod error;
pub mod service;


pub use error::ProxyError;
pub use service::SubscribeProxy;
