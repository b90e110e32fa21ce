//! The engine's read-only view of the live configuration store.

use std::sync::{PoisonError, RwLock};

use crate::model::{EmergencyState, TriggerDefinition, TriggerKey};

use super::TriggerRegistry;

/// Live trigger definitions and engine-wide flags, owned by the host.
pub trait ConfigStore: Send + Sync {
    fn trigger(&self, key: &TriggerKey) -> Option<TriggerDefinition>;
    fn emergency(&self) -> EmergencyState;
}

/// Store backed by an in-memory registry the host can swap at runtime.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    triggers: RwLock<TriggerRegistry>,
    emergency: RwLock<EmergencyState>,
}

impl InMemoryStore {
    pub fn new(triggers: TriggerRegistry) -> Self {
        Self {
            triggers: RwLock::new(triggers),
            emergency: RwLock::new(EmergencyState::default()),
        }
    }

    pub fn replace_triggers(&self, triggers: TriggerRegistry) {
        *self.triggers.write().unwrap_or_else(PoisonError::into_inner) = triggers;
    }

    pub fn upsert_trigger(&self, trigger: TriggerDefinition) {
        self.triggers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(trigger);
    }

    pub fn set_emergency(&self, state: EmergencyState) {
        *self.emergency.write().unwrap_or_else(PoisonError::into_inner) = state;
    }
}

impl ConfigStore for InMemoryStore {
    fn trigger(&self, key: &TriggerKey) -> Option<TriggerDefinition> {
        self.triggers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key.to_string())
            .cloned()
    }

    fn emergency(&self) -> EmergencyState {
        *self.emergency.read().unwrap_or_else(PoisonError::into_inner)
    }
}
