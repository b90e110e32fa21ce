//! Music track records shared by providers, events and placeholders.

use serde::{Deserialize, Serialize};

use crate::event::ChatTags;

/// A track as reported by a music provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub cover: String,
    pub duration_ms: u64,
    /// Public link to the track page.
    pub url: String,
    /// Provider-specific reference used to queue the track.
    #[serde(default)]
    pub uri: String,
}

impl Track {
    /// Read a track field by its placeholder pointer name.
    pub fn field(&self, name: &str) -> Option<crate::event::FieldValue> {
        use crate::event::FieldValue;
        match name {
            "title" => Some(FieldValue::text(&self.title)),
            "artist" => Some(FieldValue::text(&self.artist)),
            "album" => Some(FieldValue::text(&self.album)),
            "cover" => Some(FieldValue::text(&self.cover)),
            "url" => Some(FieldValue::text(&self.url)),
            "duration" | "duration_ms" => Some(FieldValue::Int(self.duration_ms as i64)),
            _ => None,
        }
    }
}

/// Derived record built when a track was added to a provider queue from chat.
/// Dispatched as a `track-added-to-queue` trigger and broadcast externally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicMessage {
    #[serde(flatten)]
    pub track: Track,
    /// Tags of the chat message that requested the track.
    pub tags: ChatTags,
}
