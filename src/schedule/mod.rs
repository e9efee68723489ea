//! Refresh scheduling policies.
//!
//! A policy looks at the local time (and, for weekly sources, the marker of the
//! cached payload) and answers two questions: run the producer now or not, and
//! how long to wait before asking again.

pub mod night;
pub mod policy;

#[cfg(test)]
mod policy_test;

pub use night::NightWindow;
pub use policy::{FixedDaytime, TieredDaytime, WeeklyWindow};

use chrono::NaiveDateTime;
use std::time::Duration;

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingDecision<M = ()> {
    pub should_run: bool,
    pub next_check_delay: Duration,
    /// Marker to stamp on the slot if this run succeeds.
    pub mark: Option<M>,
}

impl<M> SchedulingDecision<M> {
    pub fn run(after: Duration) -> Self {
        Self {
            should_run: true,
            next_check_delay: after,
            mark: None,
        }
    }

    pub fn wait(for_: Duration) -> Self {
        Self {
            should_run: false,
            next_check_delay: for_,
            mark: None,
        }
    }

    pub fn marked(mut self, mark: M) -> Self {
        self.mark = Some(mark);
        self
    }
}

/// Pure scheduling function of one refresh loop.
pub trait Policy: Send + Sync {
    type Marker: Clone + PartialEq + Send + Sync + 'static;

    fn decide(
        &self,
        now: NaiveDateTime,
        marker: Option<&Self::Marker>,
    ) -> SchedulingDecision<Self::Marker>;
}
