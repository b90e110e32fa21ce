//! Trigger execution engine: queue, routing, gating, templating and action
//! sequencing.
//!
//! Exactly one action sequence is logically active at a time. A generation
//! counter is bumped every time the front of the queue is examined; an
//! in-flight sequence holding an older [`DispatchToken`] stops before its
//! next step.

pub mod dispatch;
pub mod gate;
pub mod placeholders;
pub mod router;
pub mod sequencer;
pub mod template;
pub mod token;

pub use dispatch::Engine;
pub use gate::{CooldownLedger, Denial, GateDecision};
pub use router::{RouteStep, TEST_REWARD_ID};
pub use template::TemplateResolver;
pub use token::DispatchToken;

/// Result of looking up and running one trigger key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// No definition, disabled, or no actions.
    NotFound,
    /// Permission or cooldown refused execution.
    Gated(Denial),
    /// Every step ran.
    Executed,
    /// A newer dispatch started; remaining steps were skipped.
    Preempted,
}

/// Result of processing one queued event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The event kind maps to no trigger type.
    Unrouted,
    /// Trigger keys were derived but none is executable.
    NoMatch,
    /// Muted by emergency mode.
    Suppressed,
    Gated,
    Executed,
    Preempted,
}

impl DispatchOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            DispatchOutcome::Unrouted => "unrouted",
            DispatchOutcome::NoMatch => "no_match",
            DispatchOutcome::Suppressed => "suppressed",
            DispatchOutcome::Gated => "gated",
            DispatchOutcome::Executed => "executed",
            DispatchOutcome::Preempted => "preempted",
        }
    }
}

impl std::fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
