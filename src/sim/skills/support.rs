//! Support skills
//!
//! Defensive and economic abilities: timed protection, the one-shot shield,
//! energy recovery, the two speed-field skills, and the booster magnet.

use super::{Skill, SkillClass, SkillKey, SkillRegistry, SkillSpec};
use crate::config::DifficultyConfig;
use crate::sim::state::SimulationState;
use crate::sim::tick::collect_booster;

/// Timed pass-through protection. Obstacles neither damage nor get destroyed
/// while it runs.
struct InvincibilitySkill;

impl InvincibilitySkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Invincibility,
        class: SkillClass::Sustained,
        energy_cost: 28.0,
        cooldown_ms: 18_000.0,
        base_duration_ms: 2500.0,
    };
}

impl Skill for InvincibilitySkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn duration_at(&self, level: u8) -> f32 {
        let mut duration = Self::SPEC.base_duration_ms;
        if level >= 2 {
            duration *= 1.4;
        }
        duration
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        state.effects.invincible_ms = self.duration_at(level);
    }
}

/// One-shot shield. No countdown: it holds until the resolver consumes it.
struct ShieldSkill;

impl ShieldSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Shield,
        class: SkillClass::Instant,
        energy_cost: 16.0,
        cooldown_ms: 8000.0,
        base_duration_ms: 0.0,
    };
}

impl Skill for ShieldSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn cost_at(&self, level: u8) -> f32 {
        let mut cost = Self::SPEC.energy_cost;
        if level >= 2 {
            cost *= 0.75;
        }
        cost
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, _level: u8) {
        state.effects.shield = true;
    }
}

/// Instant energy recovery. Free to cast; the cooldown is the real price.
struct EnergySurgeSkill;

impl EnergySurgeSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::EnergySurge,
        class: SkillClass::Instant,
        energy_cost: 0.0,
        cooldown_ms: 20_000.0,
        base_duration_ms: 0.0,
    };

    fn frac_at(level: u8) -> f32 {
        let mut frac = 0.3;
        if level >= 2 {
            frac += 0.1;
        }
        if level >= 3 {
            frac += 0.1;
        }
        frac
    }
}

impl Skill for EnergySurgeSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        state.energy.gain_frac_of_cap(Self::frac_at(level));
    }
}

/// Self-cast accelerator field; feeds the same speed resolution as an
/// accelerator pickup.
struct OverclockSkill;

impl OverclockSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Overclock,
        class: SkillClass::Sustained,
        energy_cost: 18.0,
        cooldown_ms: 10_000.0,
        base_duration_ms: 3000.0,
    };
}

impl Skill for OverclockSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn duration_at(&self, level: u8) -> f32 {
        let mut duration = Self::SPEC.base_duration_ms;
        if level >= 2 {
            duration *= 1.35;
        }
        duration
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        state.effects.accel_ms = state.effects.accel_ms.max(self.duration_at(level));
    }
}

/// Self-cast decelerator field; decelerators outrank accelerators in the
/// speed resolution, so this also serves as an emergency brake.
struct TimeDilationSkill;

impl TimeDilationSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::TimeDilation,
        class: SkillClass::Sustained,
        energy_cost: 18.0,
        cooldown_ms: 10_000.0,
        base_duration_ms: 3000.0,
    };
}

impl Skill for TimeDilationSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn duration_at(&self, level: u8) -> f32 {
        let mut duration = Self::SPEC.base_duration_ms;
        if level >= 2 {
            duration *= 1.35;
        }
        duration
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        state.effects.decel_ms = state.effects.decel_ms.max(self.duration_at(level));
    }
}

/// Pull the on-screen booster straight to the player, skipping the geometry
/// check. A no-op when nothing is on screen; the activation cost is still
/// paid, so casting blind is a waste.
struct MagnetSkill;

impl MagnetSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Magnet,
        class: SkillClass::Instant,
        energy_cost: 6.0,
        cooldown_ms: 5000.0,
        base_duration_ms: 0.0,
    };
}

impl Skill for MagnetSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, cfg: &DifficultyConfig, _level: u8) {
        let id = state.current_booster_mut().map(|b| b.id);
        if let Some(id) = id {
            collect_booster(state, cfg, id);
        }
    }
}

pub fn register(registry: &mut SkillRegistry) {
    registry.register(Box::new(InvincibilitySkill));
    registry.register(Box::new(ShieldSkill));
    registry.register(Box::new(EnergySurgeSkill));
    registry.register(Box::new(OverclockSkill));
    registry.register(Box::new(TimeDilationSkill));
    registry.register(Box::new(MagnetSkill));
}
