// Package refresher drives one source: decide, produce, record, sleep.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::schedule::Policy;
use crate::storage::CacheSlot;
use crate::time::Clock;
use crate::workers::Producer;

use super::counters::Counters;
use super::telemetry;

/// Refresh loop for one source. Owns the only write access to its slot.
pub struct Refresher<P, S>
where
    P: Producer,
    S: Policy,
{
    name: &'static str,
    slot: Arc<CacheSlot<P::Output, S::Marker>>,
    producer: P,
    policy: S,
    clock: Arc<dyn Clock>,
    counters: Arc<Counters>,
}

impl<P, S> Refresher<P, S>
where
    P: Producer,
    S: Policy,
{
    /// Creates a new refresh loop.
    pub fn new(
        name: &'static str,
        slot: Arc<CacheSlot<P::Output, S::Marker>>,
        producer: P,
        policy: S,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            name,
            slot,
            producer,
            policy,
            clock,
            counters: Arc::new(Counters::new()),
        }
    }

    /// Gets the source name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Gets the loop counters.
    pub fn counters(&self) -> Arc<Counters> {
        self.counters.clone()
    }

    /// Runs one decision and, if due, one producer attempt. Returns how long
    /// to wait before the next decision. Never fails: a producer error is
    /// recorded in the slot and logged.
    pub async fn step(&self) -> Duration {
        let now = self.clock.now();
        let marker = self.slot.marker();
        let decision = self.policy.decide(now, marker.as_ref());

        if !decision.should_run {
            self.counters.skipped_checks.fetch_add(1, Ordering::Relaxed);
            debug!(
                component = "refresher",
                source = self.name,
                event = "skipped",
                next_check_in = %humantime::format_duration(decision.next_check_delay),
                "refresh not due"
            );
            return decision.next_check_delay;
        }

        info!(component = "refresher", source = self.name, event = "fetching", "fetching");

        match self.producer.produce().await {
            Ok(value) => {
                let at = self.clock.now().time();
                match decision.mark {
                    Some(mark) => self.slot.write_success_marked(value, at, mark),
                    None => self.slot.write_success(value, at),
                }
                self.counters.success_updates.fetch_add(1, Ordering::Relaxed);
                info!(
                    component = "refresher",
                    source = self.name,
                    event = "cached",
                    next_check_in = %humantime::format_duration(decision.next_check_delay),
                    "cached ok"
                );
            }
            Err(e) => {
                self.slot.write_failure(e.to_string());
                self.counters.error_updates.fetch_add(1, Ordering::Relaxed);
                error!(
                    component = "refresher",
                    source = self.name,
                    event = "refresh_failed",
                    error = %e,
                    next_check_in = %humantime::format_duration(decision.next_check_delay),
                    "refresh failed, keeping previous payload"
                );
            }
        }

        decision.next_check_delay
    }

    /// Runs the loop until `shutdown_token` is cancelled.
    pub async fn run(self, shutdown_token: CancellationToken, stats_every: Duration) {
        let counters = self.counters.clone();
        let name = self.name;
        let stats_token = shutdown_token.clone();
        tokio::task::spawn(async move {
            telemetry::logger(stats_token, name, counters, stats_every).await;
        });

        info!(component = "refresher", source = self.name, event = "started", "refresh loop started");

        loop {
            let delay = tokio::select! {
                _ = shutdown_token.cancelled() => break,
                delay = self.step() => delay,
            };

            crate::metrics::set_slot_has_error(self.name, self.slot.read().last_error.is_some());

            tokio::select! {
                _ = shutdown_token.cancelled() => break,
                _ = tokio::time::sleep(delay) => {}
            }
        }

        info!(component = "refresher", source = self.name, event = "stopped", "refresh loop stopped");
    }
}
