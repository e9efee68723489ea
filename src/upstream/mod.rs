//! Producers fetching and shaping the dashboard sources.

pub mod dinners;
pub mod error;
pub mod planner;
pub mod timetable;
pub mod transport;

// Re-export main types
pub use dinners::{DinnersProducer, HttpProductSource, ProductSource};
pub use error::ProducerError;
pub use planner::{AnthropicPlanner, MealPlanner};
pub use timetable::{HttpTimetableSource, TimetableProducer, TimetableSource};
pub use transport::TransportProducer;
