//! Outward responses built from cache records.

pub mod projector;
pub mod renderer;


pub use projector::{project, Projection, DEFAULT_CONTENT_TYPE};
