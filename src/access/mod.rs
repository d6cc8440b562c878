//! Token authentication and subscription selection.

pub mod error;
pub mod resolver;


pub use error::AuthError;
pub use resolver::{AccessResolver, Selection};
