// Background refresh workers.

pub mod backend;
pub mod refresher;

// Re-export main types
pub use backend::Producer;
pub use refresher::{Counters, Refresher};
