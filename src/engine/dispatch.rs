//! Dispatch queue: the engine's entry points and queue draining.
//!
//! Real traffic is strictly FIFO: an event stays at the front of the queue
//! until its dispatch completes, then the next one starts. Preview calls
//! bypass queueing: they replace the queue with their own event and run at
//! once, preempting whatever sequence was in flight.
//!
//! Queue, cooldown ledger and generation counter live behind one mutex so
//! generation bumps never interleave with queue mutation.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::collections::VecDeque;
use std::time::Instant;

use chrono::Utc;
use opentelemetry::KeyValue;
use tokio::sync::Notify;
use tracing::{Instrument, debug, info};

use super::gate::{CooldownLedger, GateDecision};
use super::router::{self, RouteStep};
use super::token::DispatchToken;
use super::{DispatchOutcome, LookupOutcome};
use crate::collab::Collaborators;
use crate::config::{ConfigStore, EngineConfig};
use crate::event::Event;
use crate::model::TriggerKey;
use crate::telemetry::dispatch::{record_dispatch_outcome, start_dispatch_span};
use crate::telemetry::metrics;

pub(crate) type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Process-wide mutable state, mutated only under the engine mutex.
#[derive(Debug, Default)]
pub(crate) struct Shared {
    pub(crate) queue: VecDeque<Event>,
    pub(crate) generation: u64,
    pub(crate) ledger: CooldownLedger,
}

pub(crate) fn lock(shared: &Mutex<Shared>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// What the drain loop does after one queue entry.
#[derive(Debug, PartialEq, Eq)]
enum Next {
    Continue,
    Stop,
}

/// The trigger engine. Cheap to clone; clones share all state.
pub struct Engine {
    store: Arc<dyn ConfigStore>,
    pub(crate) collab: Arc<Collaborators>,
    pub(crate) config: EngineConfig,
    shared: Arc<Mutex<Shared>>,
    idle: Arc<Notify>,
}

impl Clone for Engine {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            collab: Arc::clone(&self.collab),
            config: self.config.clone(),
            shared: Arc::clone(&self.shared),
            idle: Arc::clone(&self.idle),
        }
    }
}

impl Engine {
    pub fn new(
        store: Arc<dyn ConfigStore>,
        collaborators: Collaborators,
        config: EngineConfig,
    ) -> Self {
        Self {
            store,
            collab: Arc::new(collaborators),
            config,
            shared: Arc::new(Mutex::new(Shared::default())),
            idle: Arc::new(Notify::new()),
        }
    }

    /// Enqueue a real event. Starts draining in the background if the queue
    /// was idle. Must be called from within a tokio runtime.
    pub fn submit(&self, event: Event) {
        let start = {
            let mut shared = lock(&self.shared);
            shared.queue.push_back(event);
            shared.queue.len() == 1
        };
        if start {
            self.spawn_drain();
        }
    }

    /// Run `event` immediately in preview mode, bypassing the queue, gating
    /// and emergency suppression. Resolves when its own sequence ends; real
    /// traffic queued behind it drains in the background.
    pub async fn preview(&self, event: Event) -> DispatchOutcome {
        {
            let mut shared = lock(&self.shared);
            shared.queue.clear();
            shared.queue.push_back(event);
        }
        let (outcome, next) = self.advance(true).await;
        if next == Next::Continue {
            self.spawn_drain();
        }
        outcome.unwrap_or(DispatchOutcome::Unrouted)
    }

    /// Combined entry point: `submit` or `preview` depending on `preview`.
    pub async fn submit_with(&self, event: Event, preview: bool) -> Option<DispatchOutcome> {
        if preview {
            Some(self.preview(event).await)
        } else {
            self.submit(event);
            None
        }
    }

    /// Resolves once the queue is empty.
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            if lock(&self.shared).queue.is_empty() {
                return;
            }
            notified.await;
        }
    }

    pub fn queue_len(&self) -> usize {
        lock(&self.shared).queue.len()
    }

    /// Live generation counter.
    pub fn generation(&self) -> u64 {
        lock(&self.shared).generation
    }

    /// Snapshot of the cooldown ledger.
    pub fn cooldowns(&self) -> CooldownLedger {
        lock(&self.shared).ledger.clone()
    }

    /// Drop queued events and cooldowns, and stop any in-flight sequence.
    pub fn reset(&self) {
        {
            let mut shared = lock(&self.shared);
            shared.queue.clear();
            shared.ledger.clear();
            shared.generation += 1;
        }
        self.idle.notify_waiters();
        info!("engine reset");
    }

    fn spawn_drain(&self) {
        let engine = self.clone();
        tokio::spawn(async move {
            while engine.advance(false).await.1 == Next::Continue {}
        });
    }

    /// Stamp a new generation, process the front of the queue, then remove it
    /// unless a newer dispatch took over meanwhile.
    async fn advance(&self, preview: bool) -> (Option<DispatchOutcome>, Next) {
        let (mut event, token) = {
            let mut shared = lock(&self.shared);
            shared.generation += 1;
            match shared.queue.front() {
                Some(event) => (
                    event.clone(),
                    DispatchToken::new(shared.generation, Arc::clone(&self.shared)),
                ),
                None => {
                    drop(shared);
                    self.idle.notify_waiters();
                    return (None, Next::Stop);
                }
            }
        };

        let span = start_dispatch_span(event.kind_name(), &event.id, token.stamp());
        let started = Instant::now();
        let outcome = self
            .dispatch(&mut event, &token, preview)
            .instrument(span.clone())
            .await;
        record_dispatch_outcome(&span, outcome.as_str());
        metrics::dispatch_duration_ms().record(
            started.elapsed().as_secs_f64() * 1000.0,
            &[KeyValue::new("outcome", outcome.as_str())],
        );

        // Ownership of the queue passed to whichever dispatch preempted us.
        if outcome == DispatchOutcome::Preempted || !token.is_current() {
            return (Some(outcome), Next::Stop);
        }

        let remaining = {
            let mut shared = lock(&self.shared);
            if shared.queue.front().is_some_and(|front| front.id == event.id) {
                shared.queue.pop_front();
            }
            shared.queue.len()
        };
        if remaining == 0 {
            self.idle.notify_waiters();
            (Some(outcome), Next::Stop)
        } else {
            (Some(outcome), Next::Continue)
        }
    }

    /// Route one event and run its lookups in order.
    async fn dispatch(
        &self,
        event: &mut Event,
        token: &DispatchToken,
        preview: bool,
    ) -> DispatchOutcome {
        // Preview ignores emergency mode entirely.
        let emergency = if preview {
            Default::default()
        } else {
            self.store.emergency()
        };
        let steps = router::route(event, emergency);
        if steps.is_empty() {
            return DispatchOutcome::Unrouted;
        }

        let mut outcome = DispatchOutcome::NoMatch;
        for step in steps {
            // A lookup that ended after preemption must not start the next one.
            if !token.is_current() {
                return DispatchOutcome::Preempted;
            }
            let (key, exclusive) = match step {
                RouteStep::Suppress(trigger) => {
                    info!(%trigger, "trigger suppressed by emergency mode");
                    return DispatchOutcome::Suppressed;
                }
                RouteStep::Lookup { key, exclusive } => (key, exclusive),
            };

            let result = self.execute_lookup(&key, event, token, preview).await;
            match result {
                LookupOutcome::NotFound => continue,
                LookupOutcome::Preempted => return DispatchOutcome::Preempted,
                LookupOutcome::Executed => outcome = DispatchOutcome::Executed,
                LookupOutcome::Gated(_) => {
                    if outcome != DispatchOutcome::Executed {
                        outcome = DispatchOutcome::Gated;
                    }
                }
            }
            if exclusive {
                break;
            }
        }
        outcome
    }

    /// Look up `key`, gate it, and run its actions. Also the re-entry point
    /// for derived dispatches, which share the caller's token.
    pub(crate) fn execute_lookup<'a>(
        &'a self,
        key: &'a TriggerKey,
        event: &'a Event,
        token: &'a DispatchToken,
        preview: bool,
    ) -> BoxFuture<'a, LookupOutcome> {
        Box::pin(async move {
            if !token.is_current() {
                return LookupOutcome::Preempted;
            }
            let Some(trigger) = self.store.trigger(key).filter(|t| t.is_executable()) else {
                debug!(trigger = %key, "no executable trigger");
                return LookupOutcome::NotFound;
            };

            if !preview {
                let rendered = key.to_string();
                let decision = {
                    let mut shared = lock(&self.shared);
                    // Generation and ledger share the lock: a dispatch that was
                    // preempted meanwhile never records a deadline.
                    if shared.generation != token.stamp() {
                        return LookupOutcome::Preempted;
                    }
                    shared.ledger.check(
                        &trigger,
                        &rendered,
                        event.tags(),
                        Utc::now().timestamp_millis(),
                    )
                };
                if let GateDecision::Denied(denial) = decision {
                    info!(trigger = %key, reason = denial.as_str(), "trigger gated");
                    metrics::dispatch_outcomes().add(
                        1,
                        &[
                            KeyValue::new("trigger", rendered),
                            KeyValue::new("outcome", "gated"),
                        ],
                    );
                    return LookupOutcome::Gated(denial);
                }
            }

            info!(trigger = %key, generation = token.stamp(), preview, "executing trigger");
            let outcome = self.run_sequence(&trigger, key, event, token, preview).await;
            let label = match outcome {
                LookupOutcome::Preempted => "preempted",
                _ => "executed",
            };
            metrics::dispatch_outcomes().add(
                1,
                &[
                    KeyValue::new("trigger", key.to_string()),
                    KeyValue::new("outcome", label),
                ],
            );
            outcome
        })
    }
}
