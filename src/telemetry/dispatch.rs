//! Dispatch span helpers.

use tracing::Span;

use crate::model::EventId;

/// Start a span covering one queued event. `dispatch.outcome` is filled in by
/// [`record_dispatch_outcome`].
pub fn start_dispatch_span(event_kind: &str, event_id: &EventId, generation: u64) -> Span {
    tracing::info_span!(
        "spool.dispatch",
        "event.kind" = event_kind,
        "event.id" = %event_id,
        "dispatch.generation" = generation,
        "dispatch.outcome" = tracing::field::Empty,
    )
}

pub fn record_dispatch_outcome(span: &Span, outcome: &str) {
    span.record("dispatch.outcome", outcome);
    span.in_scope(|| {
        tracing::debug!(outcome, "dispatch finished");
    });
}
