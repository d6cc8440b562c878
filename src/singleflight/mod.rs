//! Per-key fetch coordination: one fill per cache key, concurrent callers wait for it.

pub mod coordinator;
pub mod error;
pub mod key_lock;


pub use coordinator::{FetchCoordinator, Obtained, Origin};
pub use error::FetchError;
pub use key_lock::KeyLock;
