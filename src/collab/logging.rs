//! Collaborators that only log what they would do. Used for dry runs.

use async_trait::async_trait;
use tracing::info;

use super::{ChatTransport, EventBroadcaster, OverlayControl};
use crate::error::Result;

/// Logs overlay calls instead of performing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingOverlay;

#[async_trait]
impl OverlayControl for LoggingOverlay {
    async fn set_text_source_content(&self, source: &str, text: &str) -> Result<()> {
        info!(source, text, "overlay: set text");
        Ok(())
    }

    async fn set_browser_source_url(&self, source: &str, url: &str) -> Result<()> {
        info!(source, url, "overlay: set browser url");
        Ok(())
    }

    async fn set_media_source_url(&self, source: &str, url: &str) -> Result<()> {
        info!(source, url, "overlay: set media url");
        Ok(())
    }

    async fn set_filter_state(&self, source: &str, filter: &str, enabled: bool) -> Result<()> {
        info!(source, filter, enabled, "overlay: set filter state");
        Ok(())
    }

    async fn set_source_state(&self, source: &str, visible: bool) -> Result<()> {
        info!(source, visible, "overlay: set source visibility");
        Ok(())
    }
}

/// Logs chat messages instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingChat;

#[async_trait]
impl ChatTransport for LoggingChat {
    async fn send_message(&self, text: &str) -> Result<()> {
        info!(text, "chat: send");
        Ok(())
    }
}

/// Logs broadcasts instead of publishing them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingBroadcaster;

#[async_trait]
impl EventBroadcaster for LoggingBroadcaster {
    async fn broadcast(&self, topic: &str, payload: serde_json::Value) -> Result<()> {
        info!(topic, %payload, "broadcast");
        Ok(())
    }
}
