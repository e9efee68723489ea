// Cache slot storage shared between refresh loops and readers.

pub mod slot;


// Re-export main types
pub use slot::{CacheSlot, SlotState, SlotStatus, Snapshot};

use crate::model::{Departures, Timetable, WeekId, WeeklyPlan};

/// Slot holding the school timetable.
pub type TimetableSlot = CacheSlot<Timetable>;

/// Slot holding the transit departures.
pub type TransportSlot = CacheSlot<Departures>;

/// Slot holding the weekly meal plan, marked with the week it was generated for.
pub type DinnersSlot = CacheSlot<WeeklyPlan, WeekId>;
