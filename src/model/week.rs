// Calendar week identity used to de-duplicate weekly refreshes.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::fmt;

/// Identifies a calendar week by the date of its Monday.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct WeekId(NaiveDate);

impl WeekId {
    /// Returns the week containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        let back = date.weekday().num_days_from_monday() as u64;
        Self(date.checked_sub_days(Days::new(back)).unwrap_or(date))
    }

    /// Monday that starts the week.
    pub fn monday(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for WeekId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_week_of_any_day_is_its_monday() {
        // 2024-03-04 is a Monday.
        for day in 4..=10 {
            assert_eq!(WeekId::of(d(2024, 3, day)).monday(), d(2024, 3, 4));
        }
        assert_eq!(WeekId::of(d(2024, 3, 11)).monday(), d(2024, 3, 11));
    }

    #[test]
    fn test_week_crosses_year_boundary() {
        // Wednesday 2025-01-01 belongs to the week of Monday 2024-12-30.
        assert_eq!(WeekId::of(d(2025, 1, 1)), WeekId::of(d(2024, 12, 30)));
        assert_eq!(WeekId::of(d(2025, 1, 1)).to_string(), "2024-12-30");
    }
}
