// Concrete policies for the three sources.

use chrono::{Datelike, NaiveDateTime, NaiveTime, Timelike, Weekday};
use std::time::Duration;

use crate::model::WeekId;
use crate::time::hm;

use super::{NightWindow, Policy, SchedulingDecision};

/// Runs on a fixed interval during the day and sleeps through the night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedDaytime {
    pub night: NightWindow,
    pub interval: Duration,
}

impl Default for FixedDaytime {
    fn default() -> Self {
        Self {
            night: NightWindow::default(),
            interval: Duration::from_secs(3600),
        }
    }
}

impl Policy for FixedDaytime {
    type Marker = ();

    fn decide(&self, now: NaiveDateTime, _marker: Option<&()>) -> SchedulingDecision {
        if self.night.contains(now.time()) {
            return SchedulingDecision::wait(self.night.until_wake(now));
        }
        SchedulingDecision::run(self.interval)
    }
}

/// Day-time cadence with a faster tier during the morning peak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieredDaytime {
    pub night: NightWindow,
    /// Peak lasts from the end of the night until this time.
    pub peak_ends: NaiveTime,
    pub peak_interval: Duration,
    pub offpeak_interval: Duration,
}

impl Default for TieredDaytime {
    fn default() -> Self {
        Self {
            night: NightWindow::default(),
            peak_ends: hm(9, 0),
            peak_interval: Duration::from_secs(600),
            offpeak_interval: Duration::from_secs(3600),
        }
    }
}

impl TieredDaytime {
    /// Delay before the next decision at `now`.
    pub fn delay_at(&self, now: NaiveDateTime) -> Duration {
        let t = now.time();
        if self.night.contains(t) {
            self.night.until_wake(now)
        } else if t < self.peak_ends {
            self.peak_interval
        } else {
            self.offpeak_interval
        }
    }
}

impl Policy for TieredDaytime {
    type Marker = ();

    fn decide(&self, now: NaiveDateTime, _marker: Option<&()>) -> SchedulingDecision {
        let delay = self.delay_at(now);
        if self.night.contains(now.time()) {
            SchedulingDecision::wait(delay)
        } else {
            SchedulingDecision::run(delay)
        }
    }
}

/// At most one run per calendar week, inside the Saturday to Monday-morning
/// window. Checks on a fixed interval, day and night.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyWindow {
    /// Hour on Monday at which the window closes.
    pub closes_at_hour: u32,
    pub interval: Duration,
}

impl Default for WeeklyWindow {
    fn default() -> Self {
        Self {
            closes_at_hour: 12,
            interval: Duration::from_secs(3600),
        }
    }
}

impl WeeklyWindow {
    pub fn is_open(&self, now: NaiveDateTime) -> bool {
        match now.weekday() {
            Weekday::Sat | Weekday::Sun => true,
            Weekday::Mon => now.hour() < self.closes_at_hour,
            _ => false,
        }
    }
}

impl Policy for WeeklyWindow {
    type Marker = WeekId;

    fn decide(&self, now: NaiveDateTime, marker: Option<&WeekId>) -> SchedulingDecision<WeekId> {
        let current = WeekId::of(now.date());
        let done_this_week = marker == Some(&current);
        let decision = if !done_this_week && self.is_open(now) {
            SchedulingDecision::run(self.interval)
        } else {
            SchedulingDecision::wait(self.interval)
        };
        decision.marked(current)
    }
}
