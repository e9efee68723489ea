// Metric name constants
pub const REFRESH_UPDATED: &str = "homeboard_refresh_updated_total";
pub const REFRESH_ERRORS: &str = "homeboard_refresh_errors_total";
pub const REFRESH_SKIPPED: &str = "homeboard_refresh_skipped_total";
pub const SLOT_HAS_ERROR: &str = "homeboard_slot_has_error";

/// Registers metric descriptions once per process.
pub fn describe() {
    static DESCRIBED: std::sync::Once = std::sync::Once::new();
    DESCRIBED.call_once(|| {
        metrics::describe_counter!(REFRESH_UPDATED, "Successful producer runs per source");
        metrics::describe_counter!(REFRESH_ERRORS, "Failed producer runs per source");
        metrics::describe_counter!(REFRESH_SKIPPED, "Scheduling checks that did not run the producer");
        metrics::describe_gauge!(SLOT_HAS_ERROR, "1 when the slot's last attempt failed");
    });
}

/// Adds refresher stats for one source.
pub fn add_refresher_stat_counters(source: &'static str, updated: i64, errors: i64, skipped: i64) {
    metrics::counter!(REFRESH_UPDATED, "source" => source).increment(updated.max(0) as u64);
    metrics::counter!(REFRESH_ERRORS, "source" => source).increment(errors.max(0) as u64);
    metrics::counter!(REFRESH_SKIPPED, "source" => source).increment(skipped.max(0) as u64);
}

/// Sets whether the slot currently carries an error.
pub fn set_slot_has_error(source: &'static str, has_error: bool) {
    metrics::gauge!(SLOT_HAS_ERROR, "source" => source).set(if has_error { 1.0 } else { 0.0 });
}
