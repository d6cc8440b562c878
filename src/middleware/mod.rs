// HTTP middlewares applied around every controller route.

pub mod cors_middleware;
pub mod middleware;
pub mod trace_middleware;


pub use cors_middleware::CorsMiddleware;
pub use middleware::Middleware;
pub use trace_middleware::TraceMiddleware;
