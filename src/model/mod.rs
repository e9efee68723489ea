// Domain payloads held by the cache slots.

pub mod dinners;
pub mod timetable;
pub mod transport;
pub mod week;

// Re-export main types
pub use dinners::{Meal, WeeklyPlan, MEAL_DAYS};
pub use timetable::{format_date_fr, Child, Day, Homework, HomeworkDay, Lesson, Timetable};
pub use transport::{Arrival, Departures, RailDeparture};
pub use week::WeekId;
