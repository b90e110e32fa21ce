//! Core data model.
//!
//! A trigger binds a canonical event type to an ordered list of action steps,
//! optionally gated by permissions and cooldowns. Events are identified by an
//! [`EventId`] for the lifetime of their stay in the dispatch queue.

pub mod music;
pub mod trigger;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use music::{MusicMessage, Track};
pub use trigger::{
    ActionStep, ChatStep, Cooldown, MusicAction, MusicStep, ObsStep, PermissionSet,
    TriggerDefinition, TriggerKey, TriggerType,
};

// ---------------------------------------------------------------------------
// Event identity
// ---------------------------------------------------------------------------

/// Newtype for queued event IDs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Short display: first 8 chars of UUID
        write!(f, "{}", &self.0.to_string()[..8])
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Emergency mode
// ---------------------------------------------------------------------------

/// Global suppression state read from the configuration store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmergencyState {
    /// Emergency mode is currently active.
    pub enabled: bool,
    /// While active, follow/sub/subgift/bits triggers are muted.
    #[serde(default)]
    pub no_triggers: bool,
}
