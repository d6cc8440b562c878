// On-disk cache record storage.

pub mod store;


// Re-export main types
pub use store::CacheStore;
