//! Cancellation token captured when a dispatch begins.

use std::sync::{Arc, Mutex};

use super::dispatch::{Shared, lock};

/// Generation stamp of one dispatch. Checked before every action step; once
/// the live generation moves on, the holder must stop without further side
/// effects.
#[derive(Clone)]
pub struct DispatchToken {
    stamp: u64,
    shared: Arc<Mutex<Shared>>,
}

impl DispatchToken {
    pub(crate) fn new(stamp: u64, shared: Arc<Mutex<Shared>>) -> Self {
        Self { stamp, shared }
    }

    pub fn stamp(&self) -> u64 {
        self.stamp
    }

    /// No newer dispatch has started since this token was issued.
    pub fn is_current(&self) -> bool {
        lock(&self.shared).generation == self.stamp
    }
}

impl std::fmt::Debug for DispatchToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchToken")
            .field("stamp", &self.stamp)
            .finish()
    }
}
