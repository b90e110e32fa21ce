//! Trigger definitions: canonical types, lookup keys, gating and action steps.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::Error;

// ---------------------------------------------------------------------------
// Trigger type
// ---------------------------------------------------------------------------

/// Canonical trigger types. String forms never contain `_`, which is
/// reserved as the separator between a base type and its sub-key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerType {
    Follow,
    Sub,
    Subgift,
    Raid,
    RewardRedeem,
    ChatCommand,
    Bits,
    FirstAllTime,
    FirstToday,
    PollResult,
    PredictionResult,
    BingoResult,
    RaffleResult,
    CountdownStart,
    CountdownStop,
    TimerStart,
    TimerStop,
    StreamInfoUpdate,
    EmergencyModeStart,
    EmergencyModeStop,
    HighlightChatMessage,
    ChatAlert,
    MusicStart,
    MusicStop,
    TrackAddedToQueue,
}

impl TriggerType {
    pub const ALL: [TriggerType; 25] = [
        TriggerType::Follow,
        TriggerType::Sub,
        TriggerType::Subgift,
        TriggerType::Raid,
        TriggerType::RewardRedeem,
        TriggerType::ChatCommand,
        TriggerType::Bits,
        TriggerType::FirstAllTime,
        TriggerType::FirstToday,
        TriggerType::PollResult,
        TriggerType::PredictionResult,
        TriggerType::BingoResult,
        TriggerType::RaffleResult,
        TriggerType::CountdownStart,
        TriggerType::CountdownStop,
        TriggerType::TimerStart,
        TriggerType::TimerStop,
        TriggerType::StreamInfoUpdate,
        TriggerType::EmergencyModeStart,
        TriggerType::EmergencyModeStop,
        TriggerType::HighlightChatMessage,
        TriggerType::ChatAlert,
        TriggerType::MusicStart,
        TriggerType::MusicStop,
        TriggerType::TrackAddedToQueue,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerType::Follow => "follow",
            TriggerType::Sub => "sub",
            TriggerType::Subgift => "subgift",
            TriggerType::Raid => "raid",
            TriggerType::RewardRedeem => "reward",
            TriggerType::ChatCommand => "command",
            TriggerType::Bits => "bits",
            TriggerType::FirstAllTime => "first-all-time",
            TriggerType::FirstToday => "first-today",
            TriggerType::PollResult => "poll-result",
            TriggerType::PredictionResult => "prediction-result",
            TriggerType::BingoResult => "bingo-result",
            TriggerType::RaffleResult => "raffle-result",
            TriggerType::CountdownStart => "countdown-start",
            TriggerType::CountdownStop => "countdown-stop",
            TriggerType::TimerStart => "timer-start",
            TriggerType::TimerStop => "timer-stop",
            TriggerType::StreamInfoUpdate => "stream-info",
            TriggerType::EmergencyModeStart => "emergency-start",
            TriggerType::EmergencyModeStop => "emergency-stop",
            TriggerType::HighlightChatMessage => "highlight-overlay",
            TriggerType::ChatAlert => "chat-alert",
            TriggerType::MusicStart => "music-start",
            TriggerType::MusicStop => "music-stop",
            TriggerType::TrackAddedToQueue => "track-added-to-queue",
        }
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TriggerType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| Error::InvalidTriggerKey(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Trigger key
// ---------------------------------------------------------------------------

/// Lookup key for a trigger definition: a base type, optionally suffixed
/// with a sub-key (reward id or chat command), rendered as `base_sub`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TriggerKey {
    pub base: TriggerType,
    pub sub: Option<String>,
}

impl TriggerKey {
    pub fn new(base: TriggerType) -> Self {
        Self { base, sub: None }
    }

    pub fn with_sub(base: TriggerType, sub: impl Into<String>) -> Self {
        Self {
            base,
            sub: Some(sub.into()),
        }
    }
}

impl From<TriggerType> for TriggerKey {
    fn from(base: TriggerType) -> Self {
        Self::new(base)
    }
}

impl std::fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.sub {
            Some(sub) => write!(f, "{}_{sub}", self.base),
            None => write!(f, "{}", self.base),
        }
    }
}

impl FromStr for TriggerKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once('_') {
            Some((base, sub)) if !sub.is_empty() => Ok(Self::with_sub(base.parse()?, sub)),
            Some(_) => Err(Error::InvalidTriggerKey(s.to_string())),
            None => Ok(Self::new(s.parse()?)),
        }
    }
}

impl TryFrom<String> for TriggerKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<TriggerKey> for String {
    fn from(key: TriggerKey) -> Self {
        key.to_string()
    }
}

// ---------------------------------------------------------------------------
// Trigger definition
// ---------------------------------------------------------------------------

/// A configured rule. Owned by the configuration store; the engine only reads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerDefinition {
    pub key: TriggerKey,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default)]
    pub permissions: Option<PermissionSet>,
    #[serde(default)]
    pub cooldown: Option<Cooldown>,
    #[serde(default)]
    pub actions: Vec<ActionStep>,
}

fn default_enabled() -> bool {
    true
}

impl TriggerDefinition {
    pub fn new(key: impl Into<TriggerKey>) -> Self {
        Self {
            key: key.into(),
            enabled: true,
            permissions: None,
            cooldown: None,
            actions: Vec::new(),
        }
    }

    pub fn permissions(mut self, permissions: PermissionSet) -> Self {
        self.permissions = Some(permissions);
        self
    }

    pub fn cooldown(mut self, global: u64, user: u64) -> Self {
        self.cooldown = Some(Cooldown { global, user });
        self
    }

    pub fn action(mut self, step: ActionStep) -> Self {
        self.actions.push(step);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// Enabled and has at least one action.
    pub fn is_executable(&self) -> bool {
        self.enabled && !self.actions.is_empty()
    }
}

/// Which actors may run a trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionSet {
    #[serde(default)]
    pub broadcaster: bool,
    #[serde(default)]
    pub mods: bool,
    #[serde(default)]
    pub vips: bool,
    #[serde(default)]
    pub subs: bool,
    #[serde(default)]
    pub all: bool,
    /// Logins allowed regardless of role, comma or space separated.
    #[serde(default)]
    pub users: String,
}

impl PermissionSet {
    pub fn everyone() -> Self {
        Self {
            all: true,
            ..Self::default()
        }
    }
}

/// Cooldowns in seconds. Zero disables that scope.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cooldown {
    #[serde(default)]
    pub global: u64,
    #[serde(default)]
    pub user: u64,
}

// ---------------------------------------------------------------------------
// Action steps
// ---------------------------------------------------------------------------

/// One unit of side effect within a trigger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionStep {
    Obs(ObsStep),
    Chat(ChatStep),
    Music(MusicStep),
}

impl ActionStep {
    /// Seconds to wait after this step completes.
    pub fn delay(&self) -> f64 {
        match self {
            ActionStep::Obs(s) => s.delay,
            ActionStep::Chat(s) => s.delay,
            ActionStep::Music(s) => s.delay,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ActionStep::Obs(_) => "obs",
            ActionStep::Chat(_) => "chat",
            ActionStep::Music(_) => "music",
        }
    }
}

/// Overlay control on a named source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObsStep {
    pub source_name: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub media_path: Option<String>,
    #[serde(default)]
    pub filter_name: Option<String>,
    #[serde(default)]
    pub show: bool,
    #[serde(default)]
    pub delay: f64,
}

/// Outgoing chat message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatStep {
    pub text: String,
    #[serde(default)]
    pub delay: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MusicAction {
    AddTrackToQueue,
    NextTrack,
    PausePlayback,
    ResumePlayback,
}

/// Music-queue control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicStep {
    pub music_action: MusicAction,
    /// Chat message sent once a track was queued.
    #[serde(default)]
    pub confirm_message: Option<String>,
    #[serde(default)]
    pub delay: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_key_splits_at_first_underscore() {
        let key: TriggerKey = "command_!so_me".parse().unwrap();
        assert_eq!(key.base, TriggerType::ChatCommand);
        assert_eq!(key.sub.as_deref(), Some("!so_me"));
        assert_eq!(key.to_string(), "command_!so_me");

        assert_eq!("follow".parse::<TriggerKey>().unwrap(), TriggerType::Follow.into());
        assert!("command_".parse::<TriggerKey>().is_err());
        assert!("unknown".parse::<TriggerKey>().is_err());
    }

    #[test]
    fn every_type_round_trips_through_its_key() {
        for ty in TriggerType::ALL {
            assert!(!ty.as_str().contains('_'), "{ty}");
            assert_eq!(ty.as_str().parse::<TriggerType>().unwrap(), ty);
        }
    }
}
