// Package refresher provides counters for refresh loops.

use std::sync::atomic::{AtomicI64, Ordering};

/// Counters for one refresh loop.
pub struct Counters {
    /// Producer calls that returned a payload.
    pub success_updates: AtomicI64,
    /// Producer calls that failed.
    pub error_updates: AtomicI64,
    /// Decisions that did not call the producer.
    pub skipped_checks: AtomicI64,
}

impl Counters {
    /// Creates new counters.
    pub fn new() -> Self {
        Self {
            success_updates: AtomicI64::new(0),
            error_updates: AtomicI64::new(0),
            skipped_checks: AtomicI64::new(0),
        }
    }

    /// Resets all counters and returns their previous values as
    /// `(success, errors, skipped)`.
    pub fn reset(&self) -> (i64, i64, i64) {
        let updated = self.success_updates.swap(0, Ordering::Relaxed);
        let errors = self.error_updates.swap(0, Ordering::Relaxed);
        let skipped = self.skipped_checks.swap(0, Ordering::Relaxed);
        (updated, errors, skipped)
    }
}

impl Default for Counters {
    fn default() -> Self {
        Self::new()
    }
}
