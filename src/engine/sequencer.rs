//! Action sequencing: runs a matched trigger's steps one at a time.
//!
//! Before every step the dispatch token is checked; once a newer dispatch has
//! started the sequence stops without further side effects. Each external
//! call is bounded by the configured step timeout, and a failed or timed-out
//! call only ends its own step.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::dispatch::Engine;
use super::token::DispatchToken;
use super::{LookupOutcome, TemplateResolver};
use crate::collab::TRACK_ADDED_TO_QUEUE;
use crate::error::{Error, Result};
use crate::event::{ChatMessage, Event, EventKind};
use crate::model::{
    ActionStep, ChatStep, MusicAction, MusicMessage, MusicStep, ObsStep, TriggerDefinition,
    TriggerKey, TriggerType,
};
use crate::telemetry::metrics;

impl Engine {
    /// Run every step of `trigger`, or stop early when `token` goes stale.
    pub(crate) async fn run_sequence(
        &self,
        trigger: &TriggerDefinition,
        key: &TriggerKey,
        event: &Event,
        token: &DispatchToken,
        preview: bool,
    ) -> LookupOutcome {
        for (index, step) in trigger.actions.iter().enumerate() {
            if !token.is_current() {
                info!(
                    trigger = %key,
                    generation = token.stamp(),
                    step = index,
                    "sequence preempted by a newer dispatch"
                );
                metrics::sequences_preempted().add(1, &[]);
                return LookupOutcome::Preempted;
            }

            debug!(trigger = %key, step = index, kind = step.kind(), "running step");
            match step {
                ActionStep::Obs(obs) => self.run_obs(obs, key, event).await,
                ActionStep::Chat(chat) => self.run_chat(chat, key, event).await,
                ActionStep::Music(music) => self.run_music(music, key, event, token, preview).await,
            }
            metrics::actions_executed().add(1, &[opentelemetry::KeyValue::new("kind", step.kind())]);

            let delay = step.delay();
            if delay > 0.0 {
                match Duration::try_from_secs_f64(delay) {
                    Ok(wait) => tokio::time::sleep(wait).await,
                    Err(e) => warn!(trigger = %key, step = index, delay, error = %e, "unusable step delay, not waiting"),
                }
            }
        }
        LookupOutcome::Executed
    }

    async fn run_obs(&self, step: &ObsStep, key: &TriggerKey, event: &Event) {
        let resolver = TemplateResolver::new(&self.collab);
        let overlay = &self.collab.overlay;
        let source = step.source_name.as_str();

        if let Some(text) = non_empty(&step.text) {
            let text = resolver.resolve(key, event, text, false).await;
            self.call("overlay", overlay.set_text_source_content(source, &text))
                .await;
        }
        if let Some(url) = non_empty(&step.url) {
            let url = resolver.resolve(key, event, url, true).await;
            self.call("overlay", overlay.set_browser_source_url(source, &url))
                .await;
        }
        if let Some(path) = non_empty(&step.media_path) {
            let path = resolver.resolve(key, event, path, false).await;
            self.call("overlay", overlay.set_media_source_url(source, &path))
                .await;
        }

        match non_empty(&step.filter_name) {
            Some(filter) => {
                self.call("overlay", overlay.set_filter_state(source, filter, step.show))
                    .await;
            }
            None => {
                let mut show = step.show;
                // An empty highlight must never be shown.
                if key.base == TriggerType::HighlightChatMessage {
                    if let EventKind::OverlayHighlight(highlight) = &event.kind {
                        if highlight.message.as_deref().is_none_or(str::is_empty) {
                            show = false;
                        }
                    }
                }
                self.call("overlay", overlay.set_source_state(source, show))
                    .await;
            }
        }
    }

    async fn run_chat(&self, step: &ChatStep, key: &TriggerKey, event: &Event) {
        let text = TemplateResolver::new(&self.collab)
            .resolve(key, event, &step.text, false)
            .await;
        self.call("chat", self.collab.chat.send_message(&text)).await;
    }

    async fn run_music(
        &self,
        step: &MusicStep,
        key: &TriggerKey,
        event: &Event,
        token: &DispatchToken,
        preview: bool,
    ) {
        match step.music_action {
            MusicAction::AddTrackToQueue => {
                if let Some(chat) = event.chat() {
                    self.queue_track(step, key, chat, token, preview).await;
                }
            }
            MusicAction::NextTrack => {
                for provider in self.collab.connected_music() {
                    self.call("music", provider.next_track()).await;
                }
            }
            MusicAction::PausePlayback => {
                for provider in self.collab.connected_music() {
                    self.call("music", provider.pause()).await;
                }
            }
            MusicAction::ResumePlayback => {
                for provider in self.collab.connected_music() {
                    self.call("music", provider.resume()).await;
                }
            }
        }
    }

    /// Search the command argument on connected providers in priority order,
    /// queue the first hit, then announce it.
    async fn queue_track(
        &self,
        step: &MusicStep,
        key: &TriggerKey,
        chat: &ChatMessage,
        token: &DispatchToken,
        preview: bool,
    ) {
        let query = command_argument(chat.message.as_deref().unwrap_or_default());
        if query.is_empty() {
            debug!(trigger = %key, "add-to-queue without a search query");
            return;
        }

        let mut queued = None;
        for provider in self.collab.connected_music() {
            let found = match provider.track_url_id(query) {
                Some(id) => self.call("music", provider.search_track_by_url_id(&id)).await,
                None => self.call("music", provider.search_track_by_text(query)).await,
            };
            let Some(track) = found.flatten() else {
                debug!(provider = provider.name(), query, "no track found");
                continue;
            };
            if self.call("music", provider.add_to_queue(&track)).await == Some(true) {
                info!(provider = provider.name(), title = %track.title, "track queued");
                queued = Some(track);
                break;
            }
        }
        let Some(track) = queued else {
            info!(trigger = %key, query, "no provider could queue the track");
            return;
        };

        if !token.is_current() {
            info!(trigger = %key, "track queued after preemption, skipping announcements");
            return;
        }

        let message = MusicMessage {
            track,
            tags: chat.tags.clone(),
        };
        match serde_json::to_value(&message) {
            Ok(payload) => {
                self.call(
                    "broadcast",
                    self.collab.broadcaster.broadcast(TRACK_ADDED_TO_QUEUE, payload),
                )
                .await;
            }
            Err(e) => warn!(error = %e, "cannot serialize queued track"),
        }

        let queued_key = TriggerKey::new(TriggerType::TrackAddedToQueue);
        let queued_event = Event::new(EventKind::Music(message));
        // The queued-track event has no chat payload, so its own sequence can
        // never queue another track.
        if key.base != TriggerType::TrackAddedToQueue
            && self
                .execute_lookup(&queued_key, &queued_event, token, preview)
                .await
                == LookupOutcome::Preempted
        {
            return;
        }

        if !token.is_current() {
            return;
        }
        if let Some(confirm) = non_empty(&step.confirm_message) {
            let text = TemplateResolver::new(&self.collab)
                .resolve(&queued_key, &queued_event, confirm, false)
                .await;
            self.call("chat", self.collab.chat.send_message(&text)).await;
        }
    }

    /// Await an external call under the step timeout. Failures are logged and
    /// counted, never propagated.
    pub(crate) async fn call<T>(
        &self,
        service: &'static str,
        fut: impl Future<Output = Result<T>>,
    ) -> Option<T> {
        let timeout = self.config.step_timeout;
        let error = match tokio::time::timeout(timeout, fut).await {
            Ok(Ok(value)) => return Some(value),
            Ok(Err(e)) => e,
            Err(_) => Error::Timeout {
                service,
                after_ms: timeout.as_millis() as u64,
            },
        };
        let reason = match error {
            Error::Timeout { .. } => "timeout",
            _ => "error",
        };
        warn!(service, error = %error, "external call failed, continuing");
        metrics::action_failures().add(
            1,
            &[
                opentelemetry::KeyValue::new("service", service),
                opentelemetry::KeyValue::new("reason", reason),
            ],
        );
        None
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Chat message minus its first token (the command itself).
fn command_argument(text: &str) -> &str {
    text.trim()
        .split_once(char::is_whitespace)
        .map(|(_, rest)| rest.trim())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::command_argument;

    #[test]
    fn command_argument_drops_first_token() {
        assert_eq!(command_argument("!sr never gonna give"), "never gonna give");
        assert_eq!(command_argument("  !sr   spaced  "), "spaced");
        assert_eq!(command_argument("!sr"), "");
    }
}
