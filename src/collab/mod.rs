//! Interfaces to the external services the engine drives.
//!
//! The engine owns none of these: overlay control, chat transport, music
//! providers and the public event broadcast are thin clients supplied by the
//! host. Every call is async and may fail; the engine logs failures and moves
//! on to the next step.

pub mod logging;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::model::Track;
use crate::text::{CheermoteRenderer, PlainCheermotes};

/// Overlay / streaming-software source control.
#[async_trait]
pub trait OverlayControl: Send + Sync {
    async fn set_text_source_content(&self, source: &str, text: &str) -> Result<()>;
    async fn set_browser_source_url(&self, source: &str, url: &str) -> Result<()>;
    async fn set_media_source_url(&self, source: &str, url: &str) -> Result<()>;
    async fn set_filter_state(&self, source: &str, filter: &str, enabled: bool) -> Result<()>;
    async fn set_source_state(&self, source: &str, visible: bool) -> Result<()>;
}

/// Outgoing chat.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send_message(&self, text: &str) -> Result<()>;
}

/// A music provider client. Several may be connected at once.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    fn name(&self) -> &str;

    fn is_connected(&self) -> bool;

    /// Extract a provider track id when `text` is one of its track URLs.
    fn track_url_id(&self, _text: &str) -> Option<String> {
        None
    }

    async fn search_track_by_url_id(&self, id: &str) -> Result<Option<Track>>;
    async fn search_track_by_text(&self, query: &str) -> Result<Option<Track>>;
    /// Returns `false` when the provider refused to queue the track.
    async fn add_to_queue(&self, track: &Track) -> Result<bool>;
    async fn next_track(&self) -> Result<()>;
    async fn pause(&self) -> Result<()>;
    async fn resume(&self) -> Result<()>;

    /// Track currently playing, if the provider knows it.
    fn current_track(&self) -> Option<Track>;
}

/// Public event broadcast to external listeners (overlays, bots).
#[async_trait]
pub trait EventBroadcaster: Send + Sync {
    async fn broadcast(&self, topic: &str, payload: serde_json::Value) -> Result<()>;
}

/// Topic broadcast when a track was queued from chat.
pub const TRACK_ADDED_TO_QUEUE: &str = "TRACK_ADDED_TO_QUEUE";

/// All services the engine talks to.
#[derive(Clone)]
pub struct Collaborators {
    pub overlay: Arc<dyn OverlayControl>,
    pub chat: Arc<dyn ChatTransport>,
    /// Priority order: the primary provider first.
    pub music: Vec<Arc<dyn MusicProvider>>,
    pub broadcaster: Arc<dyn EventBroadcaster>,
    pub cheermotes: Arc<dyn CheermoteRenderer>,
}

impl Collaborators {
    pub fn new(
        overlay: Arc<dyn OverlayControl>,
        chat: Arc<dyn ChatTransport>,
        broadcaster: Arc<dyn EventBroadcaster>,
    ) -> Self {
        Self {
            overlay,
            chat,
            music: Vec::new(),
            broadcaster,
            cheermotes: Arc::new(PlainCheermotes),
        }
    }

    pub fn music_provider(mut self, provider: Arc<dyn MusicProvider>) -> Self {
        self.music.push(provider);
        self
    }

    pub fn cheermotes(mut self, renderer: Arc<dyn CheermoteRenderer>) -> Self {
        self.cheermotes = renderer;
        self
    }

    /// Connected providers, in priority order.
    pub fn connected_music(&self) -> impl Iterator<Item = &Arc<dyn MusicProvider>> {
        self.music.iter().filter(|p| p.is_connected())
    }

    /// Currently playing track from the first connected provider that has one.
    pub fn current_track(&self) -> Option<Track> {
        self.connected_music().find_map(|p| p.current_track())
    }
}
