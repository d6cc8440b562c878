// Package model provides the cache key and the persisted cache record.

pub mod key;
pub mod record;


// Re-export main types
pub use key::CacheKey;
pub use record::{CacheRecord, CACHE_TTL};
