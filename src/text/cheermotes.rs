//! Cheermote rendering hook for bits messages.

use async_trait::async_trait;

/// Renders cheermote tokens (`Cheer100`) in a message for a given room.
/// Implementations typically emit `<img>` markup, which is stripped again
/// before substitution, leaving the surrounding text.
#[async_trait]
pub trait CheermoteRenderer: Send + Sync {
    async fn render(&self, text: &str, room_id: Option<&str>) -> String;
}

/// Leaves the message untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCheermotes;

#[async_trait]
impl CheermoteRenderer for PlainCheermotes {
    async fn render(&self, text: &str, _room_id: Option<&str>) -> String {
        text.to_string()
    }
}
