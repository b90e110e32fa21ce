//! Integration tests for telemetry initialization and span helpers.

use trigger_spool::model::EventId;
use trigger_spool::telemetry::{TelemetryConfig, init_telemetry};

#[test]
fn telemetry_initializes_without_endpoint() {
    // A global subscriber can only be set once per process; a second
    // initialization in the same binary returns Err, which is acceptable.
    let _guard = init_telemetry(TelemetryConfig::new(None, "debug"));
}

#[test]
fn dispatch_span_records_outcome() {
    let span = trigger_spool::telemetry::dispatch::start_dispatch_span("message", &EventId::new(), 7);
    trigger_spool::telemetry::dispatch::record_dispatch_outcome(&span, "executed");
}

#[test]
fn metric_instruments_build_without_a_provider() {
    use opentelemetry::KeyValue;
    use trigger_spool::telemetry::metrics;

    metrics::dispatch_outcomes().add(
        1,
        &[
            KeyValue::new("trigger", "follow"),
            KeyValue::new("outcome", "executed"),
        ],
    );
    metrics::sequences_preempted().add(1, &[]);
    metrics::dispatch_duration_ms().record(12.5, &[KeyValue::new("outcome", "executed")]);
}
