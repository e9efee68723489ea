// HTTP module: outbound JSON client and the read API server.

pub mod client;
#[path = "server/server.rs"]
pub mod server;

// Re-export server types
pub use server::{HttpServer, Server};

// Common controller interface
pub use crate::controller::controller::Controller;
pub use crate::middleware::middleware::Middleware;
