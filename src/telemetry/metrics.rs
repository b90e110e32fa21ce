//! Metric instrument factories for trigger-spool.
//!
//! Uses the OTel Meter API with the globally-registered `MeterProvider`.
//! All instruments are created lazily from the `"trigger-spool"` meter.

use opentelemetry::metrics::{Counter, Histogram, Meter};

fn meter() -> Meter {
    opentelemetry::global::meter("trigger-spool")
}

/// Counter: trigger lookups that reached the gate.
/// Labels: `trigger`, `outcome` ("executed" | "gated" | "preempted").
pub fn dispatch_outcomes() -> Counter<u64> {
    meter()
        .u64_counter("spool.dispatch.outcomes")
        .with_description("Trigger lookups by outcome")
        .build()
}

/// Counter: action steps run to completion.
/// Labels: `kind` ("obs" | "chat" | "music").
pub fn actions_executed() -> Counter<u64> {
    meter()
        .u64_counter("spool.actions.executed")
        .with_description("Number of action steps executed")
        .build()
}

/// Counter: external calls that failed or timed out.
/// Labels: `service`, `reason` ("error" | "timeout").
pub fn action_failures() -> Counter<u64> {
    meter()
        .u64_counter("spool.actions.failed")
        .with_description("Number of failed external calls")
        .build()
}

/// Counter: sequences stopped by a newer dispatch.
pub fn sequences_preempted() -> Counter<u64> {
    meter()
        .u64_counter("spool.sequences.preempted")
        .with_description("Number of action sequences preempted")
        .build()
}

/// Histogram: time to process one queued event, in milliseconds.
/// Labels: `outcome`.
pub fn dispatch_duration_ms() -> Histogram<f64> {
    meter()
        .f64_histogram("spool.dispatch.duration_ms")
        .with_description("Event dispatch duration in milliseconds")
        .with_unit("ms")
        .build()
}
