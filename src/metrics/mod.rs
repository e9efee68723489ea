//! Prometheus metrics for the refresh loops.
//
//! Counters are flushed from each loop's telemetry task; the exposition is
//! served by `controller::metrics`.

pub mod meter;

// Re-export commonly used items
pub use meter::*;
