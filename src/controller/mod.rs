// HTTP API controllers for the dashboard endpoints.

pub mod controller;
pub mod index;
pub mod metrics;
pub mod slot;
pub mod status;

// Re-export controller types for convenience
pub use index::IndexController;
pub use metrics::PrometheusMetricsController;
pub use slot::SlotController;
pub use status::StatusController;
