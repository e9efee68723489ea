// Single-writer, many-reader holder of one source's last known good payload.

use chrono::NaiveTime;
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;

use crate::time::truncate_to_minute;

/// Consistent copy of a slot's visible fields.
///
/// `payload` and `last_error` are independent: a slot serving stale data after
/// a failed refresh carries both.
#[derive(Debug)]
pub struct Snapshot<T, M = ()> {
    pub payload: Option<Arc<T>>,
    pub captured_at: Option<NaiveTime>,
    pub last_error: Option<String>,
    pub marker: Option<M>,
}

impl<T, M> Default for Snapshot<T, M> {
    fn default() -> Self {
        Self {
            payload: None,
            captured_at: None,
            last_error: None,
            marker: None,
        }
    }
}

impl<T, M: Clone> Clone for Snapshot<T, M> {
    fn clone(&self) -> Self {
        Self {
            payload: self.payload.clone(),
            captured_at: self.captured_at,
            last_error: self.last_error.clone(),
            marker: self.marker.clone(),
        }
    }
}

/// Observable state of a slot, as reported to readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    /// Nothing produced and nothing failed yet.
    Loading,
    /// Never produced; the last attempt failed.
    Failed,
    /// Serving an older payload; the last attempt failed.
    Stale,
    /// Serving the payload of the last attempt.
    Fresh,
}

/// Payload-free summary of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlotStatus {
    pub state: SlotState,
    pub captured_at: Option<String>,
    pub last_error: Option<String>,
}

impl<T, M> Snapshot<T, M> {
    pub fn state(&self) -> SlotState {
        match (self.payload.is_some(), self.last_error.is_some()) {
            (false, false) => SlotState::Loading,
            (false, true) => SlotState::Failed,
            (true, true) => SlotState::Stale,
            (true, false) => SlotState::Fresh,
        }
    }

    /// Capture time formatted as `HH:MM`.
    pub fn captured_at_hhmm(&self) -> Option<String> {
        self.captured_at.map(|t| t.format("%H:%M").to_string())
    }

    pub fn status(&self) -> SlotStatus {
        SlotStatus {
            state: self.state(),
            captured_at: self.captured_at_hhmm(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Cache slot. Writes replace fields under an exclusive lock, reads copy them
/// out under a shared one; the lock is never held across a producer call.
#[derive(Debug)]
pub struct CacheSlot<T, M = ()> {
    inner: RwLock<Snapshot<T, M>>,
}

impl<T, M> Default for CacheSlot<T, M> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Snapshot::default()),
        }
    }
}

impl<T, M: Clone> CacheSlot<T, M> {
    /// Creates an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the current fields.
    pub fn read(&self) -> Snapshot<T, M> {
        self.inner.read().clone()
    }

    /// Returns the current marker only.
    pub fn marker(&self) -> Option<M> {
        self.inner.read().marker.clone()
    }

    /// Replaces the payload and clears the last error. The marker is kept.
    pub fn write_success(&self, value: T, at: NaiveTime) {
        let payload = Arc::new(value);
        let mut inner = self.inner.write();
        inner.payload = Some(payload);
        inner.captured_at = Some(truncate_to_minute(at));
        inner.last_error = None;
    }

    /// Same as [`write_success`](Self::write_success), also stamping `marker`.
    pub fn write_success_marked(&self, value: T, at: NaiveTime, marker: M) {
        let payload = Arc::new(value);
        let mut inner = self.inner.write();
        inner.payload = Some(payload);
        inner.captured_at = Some(truncate_to_minute(at));
        inner.last_error = None;
        inner.marker = Some(marker);
    }

    /// Records a failed attempt; payload, capture time and marker are untouched.
    pub fn write_failure(&self, message: impl Into<String>) {
        let message = message.into();
        self.inner.write().last_error = Some(message);
    }
}
