// Night window during which time-sensitive sources stop refreshing.

use chrono::{Duration as TimeDelta, NaiveDateTime, NaiveTime};
use std::time::Duration;

use crate::time::hm;

/// Time-of-day window, `[starts, ends)`, wrapping past midnight when
/// `starts > ends`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NightWindow {
    pub starts: NaiveTime,
    pub ends: NaiveTime,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            starts: hm(22, 0),
            ends: hm(7, 15),
        }
    }
}

impl NightWindow {
    pub fn new(starts: NaiveTime, ends: NaiveTime) -> Self {
        Self { starts, ends }
    }

    /// Whether `t` falls inside the window (start inclusive, end exclusive).
    pub fn contains(&self, t: NaiveTime) -> bool {
        if self.starts > self.ends {
            t >= self.starts || t < self.ends
        } else {
            t >= self.starts && t < self.ends
        }
    }

    /// Time left until the next end of the window. Rolls over to the next day
    /// when today's end is not strictly in the future.
    pub fn until_wake(&self, now: NaiveDateTime) -> Duration {
        let mut target = now.date().and_time(self.ends);
        if target <= now {
            target += TimeDelta::days(1);
        }
        (target - now).to_std().unwrap_or_default()
    }
}
