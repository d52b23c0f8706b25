//! Per-skill cooldown tracking
//!
//! Cooldowns are wall-clock, keyed by the `now_ms` timestamp the frame
//! scheduler feeds in. This is a different clock from ability durations
//! (accumulated dt): a cooldown starts at the activation press and keeps
//! expiring through a pause, while the ability countdown freezes. The two
//! must never be conflated — a 1 s ability with a 10 s cooldown comes back
//! 10 s after the press, not 10 s after the ability ends.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::skills::SkillKey;

/// Mapping from skill key to ready-at timestamp (wall-clock ms)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CooldownTracker {
    ready_at: HashMap<SkillKey, f64>,
}

impl CooldownTracker {
    /// A skill with no recorded activation is always ready
    pub fn is_ready(&self, key: SkillKey, now_ms: f64) -> bool {
        match self.ready_at.get(&key) {
            Some(&ready) => now_ms >= ready,
            None => true,
        }
    }

    /// Stamp the cooldown at activation time
    pub fn trigger(&mut self, key: SkillKey, now_ms: f64, cooldown_ms: f64) {
        self.ready_at.insert(key, now_ms + cooldown_ms);
    }

    /// Remaining wall-clock ms until ready (0 when ready)
    pub fn remaining_ms(&self, key: SkillKey, now_ms: f64) -> f64 {
        match self.ready_at.get(&key) {
            Some(&ready) => (ready - now_ms).max(0.0),
            None => 0.0,
        }
    }

    pub fn clear(&mut self) {
        self.ready_at.clear();
    }
}
