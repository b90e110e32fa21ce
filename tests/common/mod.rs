//! Recording fakes for the engine's collaborators.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use trigger_spool::collab::{
    ChatTransport, Collaborators, EventBroadcaster, MusicProvider, OverlayControl,
};
use trigger_spool::config::{EngineConfig, InMemoryStore, TriggerRegistry};
use trigger_spool::engine::Engine;
use trigger_spool::event::{ChatMessage, ChatTags, Event, EventKind};
use trigger_spool::model::{ActionStep, ChatStep, ObsStep, TriggerDefinition, Track};
use trigger_spool::{Error, Result};

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum OverlayCall {
    Text(String, String),
    Browser(String, String),
    Media(String, String),
    Filter(String, String, bool),
    Visible(String, bool),
}

#[derive(Default)]
pub struct RecordingOverlay {
    calls: Mutex<Vec<OverlayCall>>,
    fail: bool,
}

impl RecordingOverlay {
    /// An overlay whose every call fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<OverlayCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: OverlayCall) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            return Err(Error::collaborator("overlay", "not connected"));
        }
        Ok(())
    }
}

#[async_trait]
impl OverlayControl for RecordingOverlay {
    async fn set_text_source_content(&self, source: &str, text: &str) -> Result<()> {
        self.record(OverlayCall::Text(source.into(), text.into()))
    }

    async fn set_browser_source_url(&self, source: &str, url: &str) -> Result<()> {
        self.record(OverlayCall::Browser(source.into(), url.into()))
    }

    async fn set_media_source_url(&self, source: &str, url: &str) -> Result<()> {
        self.record(OverlayCall::Media(source.into(), url.into()))
    }

    async fn set_filter_state(&self, source: &str, filter: &str, enabled: bool) -> Result<()> {
        self.record(OverlayCall::Filter(source.into(), filter.into(), enabled))
    }

    async fn set_source_state(&self, source: &str, visible: bool) -> Result<()> {
        self.record(OverlayCall::Visible(source.into(), visible))
    }
}

// ---------------------------------------------------------------------------
// Chat
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingChat {
    sent: Mutex<Vec<String>>,
    /// When set, every send hangs this long before succeeding.
    stall: Option<Duration>,
}

impl RecordingChat {
    pub fn stalling(stall: Duration) -> Self {
        Self {
            stall: Some(stall),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<String> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatTransport for RecordingChat {
    async fn send_message(&self, text: &str) -> Result<()> {
        if let Some(stall) = self.stall {
            tokio::time::sleep(stall).await;
        }
        self.sent.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Broadcast
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct RecordingBroadcaster {
    published: Mutex<Vec<(String, Value)>>,
}

impl RecordingBroadcaster {
    pub fn published(&self) -> Vec<(String, Value)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventBroadcaster for RecordingBroadcaster {
    async fn broadcast(&self, topic: &str, payload: Value) -> Result<()> {
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Music
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeMusic {
    name: String,
    connected: bool,
    /// Result for every text search.
    found: Option<Track>,
    playing: Option<Track>,
    /// Tracks whose ids look like `<name>:<id>` are found by url id.
    url_prefix: Option<String>,
    calls: Mutex<Vec<String>>,
}

impl FakeMusic {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            connected: true,
            ..Self::default()
        }
    }

    pub fn disconnected(mut self) -> Self {
        self.connected = false;
        self
    }

    pub fn finds(mut self, track: Track) -> Self {
        self.found = Some(track);
        self
    }

    pub fn playing(mut self, track: Track) -> Self {
        self.playing = Some(track);
        self
    }

    pub fn url_prefix(mut self, prefix: &str) -> Self {
        self.url_prefix = Some(prefix.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MusicProvider for FakeMusic {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn track_url_id(&self, text: &str) -> Option<String> {
        let prefix = self.url_prefix.as_deref()?;
        text.strip_prefix(prefix).map(str::to_string)
    }

    async fn search_track_by_url_id(&self, id: &str) -> Result<Option<Track>> {
        self.record(format!("url:{id}"));
        Ok(self.found.clone())
    }

    async fn search_track_by_text(&self, query: &str) -> Result<Option<Track>> {
        self.record(format!("search:{query}"));
        Ok(self.found.clone())
    }

    async fn add_to_queue(&self, track: &Track) -> Result<bool> {
        self.record(format!("queue:{}", track.title));
        Ok(true)
    }

    async fn next_track(&self) -> Result<()> {
        self.record("next".to_string());
        Ok(())
    }

    async fn pause(&self) -> Result<()> {
        self.record("pause".to_string());
        Ok(())
    }

    async fn resume(&self) -> Result<()> {
        self.record("resume".to_string());
        Ok(())
    }

    fn current_track(&self) -> Option<Track> {
        self.playing.clone()
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

/// An engine wired to recording fakes.
pub struct Harness {
    pub engine: Engine,
    pub store: Arc<InMemoryStore>,
    pub overlay: Arc<RecordingOverlay>,
    pub chat: Arc<RecordingChat>,
    pub broadcaster: Arc<RecordingBroadcaster>,
    pub music: Vec<Arc<FakeMusic>>,
}

pub struct HarnessBuilder {
    triggers: Vec<TriggerDefinition>,
    overlay: RecordingOverlay,
    chat: RecordingChat,
    music: Vec<FakeMusic>,
    config: EngineConfig,
}

impl HarnessBuilder {
    pub fn trigger(mut self, trigger: TriggerDefinition) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn overlay(mut self, overlay: RecordingOverlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn chat(mut self, chat: RecordingChat) -> Self {
        self.chat = chat;
        self
    }

    pub fn music(mut self, provider: FakeMusic) -> Self {
        self.music.push(provider);
        self
    }

    pub fn step_timeout(mut self, timeout: Duration) -> Self {
        self.config.step_timeout = timeout;
        self
    }

    pub fn build(self) -> Harness {
        let store = Arc::new(InMemoryStore::new(
            self.triggers.into_iter().collect::<TriggerRegistry>(),
        ));
        let overlay = Arc::new(self.overlay);
        let chat = Arc::new(self.chat);
        let broadcaster = Arc::new(RecordingBroadcaster::default());
        let music: Vec<_> = self.music.into_iter().map(Arc::new).collect();

        let mut collab = Collaborators::new(overlay.clone(), chat.clone(), broadcaster.clone());
        for provider in &music {
            collab = collab.music_provider(provider.clone());
        }

        Harness {
            engine: Engine::new(store.clone(), collab, self.config),
            store,
            overlay,
            chat,
            broadcaster,
            music,
        }
    }
}

pub fn harness() -> HarnessBuilder {
    HarnessBuilder {
        triggers: Vec::new(),
        overlay: RecordingOverlay::default(),
        chat: RecordingChat::default(),
        music: Vec::new(),
        config: EngineConfig::default(),
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

pub fn chat_step(text: &str) -> ActionStep {
    ActionStep::Chat(ChatStep {
        text: text.to_string(),
        delay: 0.0,
    })
}

pub fn chat_step_then_wait(text: &str, delay: f64) -> ActionStep {
    ActionStep::Chat(ChatStep {
        text: text.to_string(),
        delay,
    })
}

pub fn text_step(source: &str, text: &str) -> ActionStep {
    ActionStep::Obs(ObsStep {
        source_name: source.to_string(),
        text: Some(text.to_string()),
        show: true,
        ..ObsStep::default()
    })
}

pub fn viewer(id: &str, name: &str) -> ChatTags {
    ChatTags {
        user_id: Some(id.to_string()),
        login: Some(name.to_lowercase()),
        display_name: Some(name.to_string()),
        ..ChatTags::default()
    }
}

pub fn message(tags: ChatTags, text: &str) -> Event {
    Event::new(EventKind::Message(ChatMessage {
        message: Some(text.to_string()),
        tags,
        ..ChatMessage::default()
    }))
}

pub fn notice(msg_id: &str, tags: ChatTags) -> Event {
    Event::new(EventKind::Message(ChatMessage {
        tags: ChatTags {
            msg_id: Some(msg_id.to_string()),
            ..tags
        },
        ..ChatMessage::default()
    }))
}

pub fn track(title: &str, artist: &str) -> Track {
    Track {
        title: title.to_string(),
        artist: artist.to_string(),
        album: "Single".to_string(),
        url: format!("https://music.example/{}", title.to_lowercase().replace(' ', "-")),
        duration_ms: 200_000,
        ..Track::default()
    }
}
