// HTTP controller trait for route registration.

use axum::Router;

/// Registers a controller's routes on the read API router.
///
/// A controller owns `Arc`s to the slots it reads and captures clones of them
/// in its handlers:
/// ```rust
/// # use axum::{Router, routing::get};
/// # async fn handler() -> &'static str { "ok" }
/// let router: Router<()> = Router::new().route("/api/status", get(handler));
/// # let _ = router;
/// ```
pub trait Controller: Send + Sync {
    fn add_route(&self, router: Router) -> Router;
}
