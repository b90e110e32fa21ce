//! Platform events consumed by the engine.
//!
//! An event is built by an external producer, pushed into the dispatch queue,
//! consumed exactly once, and may gain derived fields (poll winner, formatted
//! durations) during classification before templates are resolved against it.
//!
//! Templates address event data through dotted paths (`tags.display-name`,
//! `winner`, `duration`). [`Event::field`] maps those paths onto each variant
//! explicitly; an unknown path yields `None`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{EventId, MusicMessage, Track};

/// An incoming platform event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub id: EventId,
    #[serde(default = "Utc::now")]
    pub received_at: DateTime<Utc>,
    pub kind: EventKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventKind {
    /// Plain chat message. Follow/sub/raid notices arrive as messages
    /// distinguished by their `msg-id` tag.
    Message(ChatMessage),
    /// Highlighted chat message (reward redemptions, bits).
    Highlight(ChatMessage),
    Poll(PollResult),
    Prediction(PredictionResult),
    Bingo(BingoResult),
    Raffle(RaffleResult),
    Countdown(CountdownState),
    Timer(TimerState),
    StreamInfo(StreamInfoUpdate),
    EmergencyMode(EmergencyModeChange),
    /// Request to show (or clear) a chat message on the highlight overlay.
    OverlayHighlight(ChatHighlight),
    ChatAlert(ChatMessage),
    MusicEvent(MusicTrackEvent),
    /// Derived record: a track was queued from chat.
    Music(MusicMessage),
}

impl Event {
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::new(),
            received_at: Utc::now(),
            kind,
        }
    }

    /// Short name of the event kind, used in logs and spans.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            EventKind::Message(_) => "message",
            EventKind::Highlight(_) => "highlight",
            EventKind::Poll(_) => "poll",
            EventKind::Prediction(_) => "prediction",
            EventKind::Bingo(_) => "bingo",
            EventKind::Raffle(_) => "raffle",
            EventKind::Countdown(_) => "countdown",
            EventKind::Timer(_) => "timer",
            EventKind::StreamInfo(_) => "stream_info",
            EventKind::EmergencyMode(_) => "emergency_mode",
            EventKind::OverlayHighlight(_) => "overlay_highlight",
            EventKind::ChatAlert(_) => "chat_alert",
            EventKind::MusicEvent(_) => "music_event",
            EventKind::Music(_) => "music",
        }
    }

    /// The chat payload, for message and highlight events.
    pub fn chat(&self) -> Option<&ChatMessage> {
        match &self.kind {
            EventKind::Message(m) | EventKind::Highlight(m) => Some(m),
            _ => None,
        }
    }

    /// Actor tags, when the event carries any.
    pub fn tags(&self) -> Option<&ChatTags> {
        match &self.kind {
            EventKind::Message(m) | EventKind::Highlight(m) | EventKind::ChatAlert(m) => {
                Some(&m.tags)
            }
            EventKind::Music(m) => Some(&m.tags),
            _ => None,
        }
    }

    /// Raw message text carried by the event, if any.
    pub fn message_text(&self) -> Option<&str> {
        match &self.kind {
            EventKind::Message(m) | EventKind::Highlight(m) | EventKind::ChatAlert(m) => {
                m.message.as_deref()
            }
            EventKind::OverlayHighlight(h) => h.message.as_deref(),
            _ => None,
        }
    }

    /// Resolve a dotted field path against this event.
    pub fn field(&self, path: &str) -> Option<FieldValue> {
        match &self.kind {
            EventKind::Message(m) | EventKind::Highlight(m) | EventKind::ChatAlert(m) => {
                m.field(path)
            }
            EventKind::Poll(p) => match path {
                "title" => Some(FieldValue::text(&p.title)),
                "winner" => p.winner.as_deref().map(FieldValue::text),
                _ => None,
            },
            EventKind::Prediction(p) => match path {
                "title" => Some(FieldValue::text(&p.title)),
                "winner" => p.winner.as_deref().map(FieldValue::text),
                _ => None,
            },
            EventKind::Bingo(b) => match path {
                "guess" => b.guess.as_deref().map(FieldValue::text),
                "winner" => b.winner.as_deref().map(FieldValue::text),
                _ => None,
            },
            EventKind::Raffle(r) => match path {
                "winner" => r.winner.as_deref().map(FieldValue::text),
                _ => None,
            },
            EventKind::Countdown(c) => match path {
                "start" => c.start.as_deref().map(FieldValue::text),
                "start_ms" => Some(FieldValue::Int(c.start_at_ms)),
                "duration" => c.duration.as_deref().map(FieldValue::text),
                "duration_ms" => Some(FieldValue::Int(c.duration_ms as i64)),
                _ => None,
            },
            EventKind::Timer(t) => match path {
                "duration" => t.duration.as_deref().map(FieldValue::text),
                "duration_ms" => Some(FieldValue::Int(t.duration_ms as i64)),
                _ => None,
            },
            EventKind::StreamInfo(s) => match path {
                "title" => Some(FieldValue::text(&s.title)),
                "category" => Some(FieldValue::text(&s.category)),
                _ => None,
            },
            EventKind::EmergencyMode(e) => match path {
                "enabled" => Some(FieldValue::Bool(e.enabled)),
                _ => None,
            },
            EventKind::OverlayHighlight(h) => match path {
                "message" => h.message.as_deref().map(FieldValue::text),
                "user.display_name" => h.user.as_deref().map(FieldValue::text),
                "user.avatar" => h.avatar.as_deref().map(FieldValue::text),
                _ => None,
            },
            EventKind::MusicEvent(m) => match path.strip_prefix("track.") {
                Some(name) => m.track.as_ref().and_then(|t| t.field(name)),
                None => None,
            },
            EventKind::Music(m) => match path.strip_prefix("tags.") {
                Some(tag) => m.tags.field(tag),
                None => m.track.field(path),
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Field values
// ---------------------------------------------------------------------------

/// A value read from an event through a field path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Bool(bool),
}

impl FieldValue {
    pub fn text(s: impl Into<String>) -> Self {
        FieldValue::Text(s.into())
    }

    /// Numeric interpretation; text is parsed, anything unparsable is `None`.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Int(n) => Some(*n as f64),
            FieldValue::Text(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
            FieldValue::Bool(_) => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(n) => write!(f, "{n}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Chat payloads
// ---------------------------------------------------------------------------

/// IRC-style tags describing the actor of a chat-shaped event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ChatTags {
    pub user_id: Option<String>,
    pub login: Option<String>,
    pub display_name: Option<String>,
    /// Badge set id to version, e.g. `moderator -> 1`.
    pub badges: BTreeMap<String, String>,
    pub msg_id: Option<String>,
    pub bits: Option<u64>,
    /// First message ever sent in this channel.
    pub first_msg: bool,
    /// Emote positions, `id:start-end,start-end/id:start-end`.
    pub emotes_raw: Option<String>,
    pub room_id: Option<String>,
    #[serde(rename = "msg-param-sub-plan")]
    pub sub_plan: Option<String>,
    #[serde(rename = "msg-param-cumulative-months")]
    pub cumulative_months: Option<u32>,
    #[serde(rename = "msg-param-recipient-display-name")]
    pub recipient_display_name: Option<String>,
    #[serde(rename = "msg-param-viewerCount")]
    pub viewer_count: Option<u64>,
}

impl ChatTags {
    pub fn has_badge(&self, badge: &str) -> bool {
        self.badges.contains_key(badge)
    }

    fn field(&self, tag: &str) -> Option<FieldValue> {
        match tag {
            "user-id" => self.user_id.as_deref().map(FieldValue::text),
            "login" | "username" => self.login.as_deref().map(FieldValue::text),
            "display-name" => self
                .display_name
                .as_deref()
                .or(self.login.as_deref())
                .map(FieldValue::text),
            "msg-id" => self.msg_id.as_deref().map(FieldValue::text),
            "bits" => self.bits.map(|b| FieldValue::Int(b as i64)),
            "room-id" => self.room_id.as_deref().map(FieldValue::text),
            "msg-param-sub-plan" => self.sub_plan.as_deref().map(FieldValue::text),
            "msg-param-cumulative-months" => {
                self.cumulative_months.map(|m| FieldValue::Int(m as i64))
            }
            "msg-param-recipient-display-name" => {
                self.recipient_display_name.as_deref().map(FieldValue::text)
            }
            "msg-param-viewerCount" => self.viewer_count.map(|v| FieldValue::Int(v as i64)),
            _ => None,
        }
    }
}

/// A chat message, or a notice delivered through chat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub tags: ChatTags,
    #[serde(default)]
    pub reward: Option<RewardRedemption>,
    /// First message of this user today.
    #[serde(default)]
    pub first_message: bool,
}

impl ChatMessage {
    fn field(&self, path: &str) -> Option<FieldValue> {
        if let Some(tag) = path.strip_prefix("tags.") {
            return self.tags.field(tag);
        }
        match path {
            "message" => self.message.as_deref().map(FieldValue::text),
            "reward.id" => self.reward.as_ref().map(|r| FieldValue::text(&r.reward.id)),
            "reward.title" => self.reward.as_ref().map(|r| FieldValue::text(&r.reward.title)),
            "reward.prompt" => self
                .reward
                .as_ref()
                .and_then(|r| r.reward.prompt.as_deref())
                .map(FieldValue::text),
            "reward.cost" => self
                .reward
                .as_ref()
                .map(|r| FieldValue::Int(r.reward.cost as i64)),
            "reward.user_input" => self
                .reward
                .as_ref()
                .and_then(|r| r.user_input.as_deref())
                .map(FieldValue::text),
            _ => None,
        }
    }
}

/// Channel-points redemption attached to a highlighted message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RewardRedemption {
    pub reward: Reward,
    #[serde(default)]
    pub user_input: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub cost: u64,
}

/// Content pushed to the chat highlight overlay. Empty `message` clears it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatHighlight {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

// ---------------------------------------------------------------------------
// Results and state changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollChoice {
    pub title: String,
    pub votes: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PollResult {
    pub title: String,
    pub choices: Vec<PollChoice>,
    /// Derived: title of the winning choice.
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionOutcome {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub title: String,
    pub outcomes: Vec<PredictionOutcome>,
    pub winning_outcome_id: Option<String>,
    /// Derived: title of the winning outcome.
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BingoResult {
    #[serde(default)]
    pub guess: Option<String>,
    pub winners: Vec<String>,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RaffleResult {
    pub winners: Vec<String>,
    #[serde(default)]
    pub winner: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountdownState {
    pub started: bool,
    pub start_at_ms: i64,
    pub duration_ms: u64,
    /// Derived: formatted start time.
    #[serde(default)]
    pub start: Option<String>,
    /// Derived: formatted duration.
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub started: bool,
    pub duration_ms: u64,
    #[serde(default)]
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreamInfoUpdate {
    pub title: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmergencyModeChange {
    pub enabled: bool,
}

/// Playback started or stopped on a music provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MusicTrackEvent {
    pub start: bool,
    #[serde(default)]
    pub track: Option<Track>,
}
