// Package refresher provides periodic stats logging for refresh loops.

use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tokio_util::sync::CancellationToken;

use crate::metrics;

use super::counters::Counters;

/// Logs and exports the loop counters every `each`.
pub async fn logger(
    shutdown_token: CancellationToken,
    name: &'static str,
    counters: Arc<Counters>,
    each: Duration,
) {
    let mut ticker = interval(each);
    // first tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown_token.cancelled() => {
                tracing::debug!(svc = "refresher", source = name, "logger stopped");
                return;
            }
            _ = ticker.tick() => {
                let (updated, errors, skipped) = counters.reset();

                metrics::add_refresher_stat_counters(name, updated, errors, skipped);

                tracing::info!(
                    source = name,
                    updated = updated,
                    errors = errors,
                    skipped = skipped,
                    "refresher stats"
                );
            }
        }
    }
}
