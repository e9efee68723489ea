// Router-wide middlewares.

pub mod middleware;
pub mod trace_middleware;

pub use middleware::Middleware;
pub use trace_middleware::TraceMiddleware;
