//! Trigger definitions loaded from TOML files.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::model::TriggerDefinition;

/// Top-level TOML wrapper.
#[derive(Debug, Deserialize)]
struct TriggerFile {
    trigger: TriggerDefinition,
}

/// Trigger definitions indexed by their rendered key (`base` or `base_sub`).
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    triggers: HashMap<String, TriggerDefinition>,
}

impl TriggerRegistry {
    /// Create an empty registry with no triggers.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Load all `.toml` files from a directory, one `[trigger]` table each.
    pub fn load_from_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::empty();

        let entries = std::fs::read_dir(dir).map_err(|e| {
            Error::Config(format!("cannot read trigger dir {}: {e}", dir.display()))
        })?;

        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                let content = std::fs::read_to_string(&path)?;
                let file: TriggerFile = toml::from_str(&content).map_err(|e| {
                    Error::Config(format!("bad trigger config {}: {e}", path.display()))
                })?;
                debug!(key = %file.trigger.key, path = %path.display(), "trigger loaded");
                registry.insert(file.trigger);
            }
        }

        Ok(registry)
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, trigger: TriggerDefinition) {
        self.triggers.insert(trigger.key.to_string(), trigger);
    }

    /// Look up a definition by rendered key.
    pub fn get(&self, key: &str) -> Option<&TriggerDefinition> {
        self.triggers.get(key)
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// All definitions, sorted by key.
    pub fn definitions(&self) -> Vec<&TriggerDefinition> {
        let mut all: Vec<_> = self.triggers.values().collect();
        all.sort_by_key(|t| t.key.to_string());
        all
    }
}

impl FromIterator<TriggerDefinition> for TriggerRegistry {
    fn from_iter<I: IntoIterator<Item = TriggerDefinition>>(iter: I) -> Self {
        let mut registry = Self::empty();
        for trigger in iter {
            registry.insert(trigger);
        }
        registry
    }
}
