//! Per-source refresh loop.

pub mod counters;
pub mod refresher;
pub mod telemetry;

// Re-export main types
pub use counters::Counters;
pub use refresher::Refresher;
