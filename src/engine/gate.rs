//! Permission gate and cooldown ledger.
//!
//! Gating only applies when a trigger declares both a permission set and a
//! cooldown; otherwise execution is always allowed. Ledger entries hold the
//! epoch-millis instant after which a trigger is usable again. Entries never
//! expire explicitly: a timestamp in the past simply fails the `> now` test.

use std::collections::HashMap;

use crate::event::ChatTags;
use crate::model::TriggerDefinition;
use crate::text::permissions;

/// Why a trigger was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    Permission,
    GlobalCooldown,
    UserCooldown,
}

impl Denial {
    pub fn as_str(self) -> &'static str {
        match self {
            Denial::Permission => "permission",
            Denial::GlobalCooldown => "global_cooldown",
            Denial::UserCooldown => "user_cooldown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Denied(Denial),
}

/// Per-trigger and per-user "usable again at" timestamps.
#[derive(Debug, Clone, Default)]
pub struct CooldownLedger {
    global: HashMap<String, i64>,
    user: HashMap<String, i64>,
}

impl CooldownLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn global_until(&self, trigger_key: &str) -> Option<i64> {
        self.global.get(trigger_key).copied()
    }

    pub fn user_until(&self, trigger_key: &str, user_id: &str) -> Option<i64> {
        self.user.get(&user_key(trigger_key, user_id)).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.user.is_empty()
    }

    pub fn clear(&mut self) {
        self.global.clear();
        self.user.clear();
    }

    /// Decide whether `trigger` may run for the actor in `tags`, recording
    /// new cooldown deadlines as a side effect.
    ///
    /// The global deadline is refreshed whenever it is not active, even if the
    /// user deadline then blocks this invocation. The user deadline is only
    /// refreshed when the invocation is allowed.
    pub fn check(
        &mut self,
        trigger: &TriggerDefinition,
        trigger_key: &str,
        tags: Option<&ChatTags>,
        now_ms: i64,
    ) -> GateDecision {
        let (Some(perms), Some(cooldown)) = (&trigger.permissions, &trigger.cooldown) else {
            return GateDecision::Allowed;
        };

        let anonymous = ChatTags::default();
        let tags = tags.unwrap_or(&anonymous);

        if !permissions::is_allowed(perms, tags) {
            return GateDecision::Denied(Denial::Permission);
        }

        let mut decision = GateDecision::Allowed;

        match self.global_until(trigger_key) {
            Some(until) if until > now_ms => {
                decision = GateDecision::Denied(Denial::GlobalCooldown);
            }
            _ if cooldown.global > 0 => {
                self.global
                    .insert(trigger_key.to_string(), now_ms + seconds_ms(cooldown.global));
            }
            _ => {}
        }

        let key = user_key(trigger_key, tags.user_id.as_deref().unwrap_or_default());
        match self.user.get(&key).copied() {
            Some(until) if until > now_ms => {
                if decision == GateDecision::Allowed {
                    decision = GateDecision::Denied(Denial::UserCooldown);
                }
            }
            _ if decision == GateDecision::Allowed && cooldown.user > 0 => {
                self.user.insert(key, now_ms + seconds_ms(cooldown.user));
            }
            _ => {}
        }

        decision
    }
}

fn user_key(trigger_key: &str, user_id: &str) -> String {
    format!("{trigger_key}_{user_id}")
}

fn seconds_ms(seconds: u64) -> i64 {
    i64::try_from(seconds.saturating_mul(1000)).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PermissionSet, TriggerType};

    fn viewer(id: &str) -> ChatTags {
        ChatTags {
            user_id: Some(id.to_string()),
            login: Some(format!("user{id}")),
            ..ChatTags::default()
        }
    }

    #[test]
    fn no_gating_without_both_permissions_and_cooldown() {
        let mut ledger = CooldownLedger::new();
        let trigger = TriggerDefinition::new(TriggerType::Follow).cooldown(10, 10);
        for _ in 0..3 {
            assert_eq!(
                ledger.check(&trigger, "follow", Some(&viewer("1")), 0),
                GateDecision::Allowed
            );
        }
        assert!(ledger.is_empty());
    }

    #[test]
    fn permission_denial_leaves_ledger_untouched() {
        let mut ledger = CooldownLedger::new();
        let trigger = TriggerDefinition::new(TriggerType::Bits)
            .permissions(PermissionSet {
                mods: true,
                ..PermissionSet::default()
            })
            .cooldown(10, 10);

        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("1")), 0),
            GateDecision::Denied(Denial::Permission)
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn global_refreshed_even_when_user_blocks() {
        let mut ledger = CooldownLedger::new();
        let trigger = TriggerDefinition::new(TriggerType::Bits)
            .permissions(PermissionSet::everyone())
            .cooldown(2, 60);

        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("1")), 0),
            GateDecision::Allowed
        );
        // Global expired at 2s, user still active until 60s.
        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("1")), 5_000),
            GateDecision::Denied(Denial::UserCooldown)
        );
        assert_eq!(ledger.global_until("bits"), Some(7_000));
        assert_eq!(ledger.user_until("bits", "1"), Some(60_000));
    }

    #[test]
    fn user_cooldown_expires_for_the_same_user() {
        let mut ledger = CooldownLedger::new();
        let trigger = TriggerDefinition::new(TriggerType::Bits)
            .permissions(PermissionSet::everyone())
            .cooldown(0, 5);

        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("1")), 0),
            GateDecision::Allowed
        );
        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("1")), 4_999),
            GateDecision::Denied(Denial::UserCooldown)
        );
        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("1")), 5_001),
            GateDecision::Allowed
        );
        assert_eq!(ledger.user_until("bits", "1"), Some(10_001));
        assert_eq!(ledger.global_until("bits"), None);
    }

    #[test]
    fn global_block_does_not_record_user_deadline() {
        let mut ledger = CooldownLedger::new();
        let trigger = TriggerDefinition::new(TriggerType::Bits)
            .permissions(PermissionSet::everyone())
            .cooldown(10, 5);

        ledger.check(&trigger, "bits", Some(&viewer("1")), 0);
        assert_eq!(
            ledger.check(&trigger, "bits", Some(&viewer("2")), 1_000),
            GateDecision::Denied(Denial::GlobalCooldown)
        );
        assert_eq!(ledger.user_until("bits", "2"), None);
    }
}
