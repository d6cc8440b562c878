// HTTP module: server, client and response rendering.

pub mod client;
pub mod render;
pub mod server;

// Re-export middleware interface from the dedicated middleware module
pub use crate::middleware::middleware::Middleware;

// Re-export server types
pub use server::{HttpServer, Server};

// Common controller interface
pub use crate::controller::controller::Controller;
