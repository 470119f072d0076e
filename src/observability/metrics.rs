//! Metric recorders.
//!
//! # Metrics
//! - `ico_rpc_reads_total` (counter): contract reads by call and outcome
//! - `ico_transactions_total` (counter): transactions by operation and outcome
//! - `ico_certificate_lookups_total` (counter): per-certificate claimed lookups
//! - `ico_tokens_claimable` (gauge): last computed claimable certificate count

use std::sync::atomic::{AtomicBool, Ordering};

use metrics::{counter, gauge};

static ENABLED: AtomicBool = AtomicBool::new(true);

/// Turn metric recording on or off process-wide.
pub fn set_enabled(enabled: bool) {
    ENABLED.store(enabled, Ordering::Relaxed);
}

fn enabled() -> bool {
    ENABLED.load(Ordering::Relaxed)
}

fn outcome(ok: bool) -> &'static str {
    if ok {
        "ok"
    } else {
        "error"
    }
}

/// Record a contract read.
pub fn record_rpc_read(call: &'static str, ok: bool) {
    if enabled() {
        counter!("ico_rpc_reads_total", "call" => call, "outcome" => outcome(ok)).increment(1);
    }
}

/// Record a terminal transaction outcome.
pub fn record_transaction(operation: &'static str, ok: bool) {
    if enabled() {
        counter!("ico_transactions_total", "operation" => operation, "outcome" => outcome(ok))
            .increment(1);
    }
}

/// Record per-certificate lookups issued by one scan.
pub fn record_certificate_lookups(count: u64) {
    if enabled() {
        counter!("ico_certificate_lookups_total").increment(count);
    }
}

/// Record the latest claimable certificate count.
pub fn record_claimable(count: f64) {
    if enabled() {
        gauge!("ico_tokens_claimable").set(count);
    }
}
