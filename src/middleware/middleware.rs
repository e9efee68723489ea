// Package http provides Middleware interface.

use axum::Router;

/// Middleware wraps the whole router in a layer.
pub trait Middleware: Send + Sync {
    /// Applies the middleware to the router.
    fn apply(&self, router: Router) -> Router;
}
