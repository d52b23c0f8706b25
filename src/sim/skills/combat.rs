//! Combat skills
//!
//! Projectile launchers, the area blast, the fire aura, and ignition. These
//! never touch the jump slot; all of them may fire mid-flight.

use glam::Vec2;
use rand::Rng;

use super::{Skill, SkillClass, SkillKey, SkillRegistry, SkillSpec};
use crate::config::DifficultyConfig;
use crate::consts::*;
use crate::events::DestructionCause;
use crate::sim::state::{ObstaclePhase, Projectile, ProjectileKind, SimulationState};
use crate::sim::tick::destroy_obstacle;

fn spawn_projectile(state: &mut SimulationState, kind: ProjectileKind, vel: Vec2, ttl_ms: f32) {
    let id = state.next_entity_id();
    let pos = Vec2::new(PLAYER_X, state.player_y() + PLAYER_HEIGHT * 0.5);
    state.projectiles.push(Projectile {
        id,
        kind,
        pos,
        vel,
        ttl_ms,
    });
}

/// Straight-flying fireball. Higher ranks fly faster, rank 3 adds a cost
/// discount on top.
struct FireballSkill;

impl FireballSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Fireball,
        class: SkillClass::Instant,
        energy_cost: 15.0,
        cooldown_ms: 2500.0,
        base_duration_ms: 0.0,
    };

    fn speed_at(level: u8) -> f32 {
        let mut speed = 520.0;
        if level >= 2 {
            speed *= 1.3;
        }
        speed
    }
}

impl Skill for FireballSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn cost_at(&self, level: u8) -> f32 {
        let mut cost = Self::SPEC.energy_cost;
        if level >= 3 {
            cost *= 0.8;
        }
        cost
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        let vel = Vec2::new(Self::speed_at(level), 0.0);
        spawn_projectile(state, ProjectileKind::Fireball, vel, 2500.0);
    }
}

/// Lobbed bottle: launched up-and-forward, pulled down by gravity in the
/// projectile step, detonates on the obstacle it lands on.
struct BottleTossSkill;

impl BottleTossSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::BottleToss,
        class: SkillClass::Instant,
        energy_cost: 12.0,
        cooldown_ms: 3000.0,
        base_duration_ms: 0.0,
    };
}

impl Skill for BottleTossSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        // Higher ranks throw flatter and further
        let forward = if level >= 2 { 340.0 } else { 280.0 };
        let vel = Vec2::new(forward, -420.0);
        spawn_projectile(state, ProjectileKind::Bottle, vel, 3000.0);
    }
}

/// Hitscan-fast bullet with a short lifetime
struct BulletSkill;

impl BulletSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Bullet,
        class: SkillClass::Instant,
        energy_cost: 8.0,
        cooldown_ms: 1200.0,
        base_duration_ms: 0.0,
    };
}

impl Skill for BulletSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn cost_at(&self, level: u8) -> f32 {
        let mut cost = Self::SPEC.energy_cost;
        if level >= 2 {
            cost *= 0.85;
        }
        if level >= 3 {
            cost *= 0.85;
        }
        cost
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, _level: u8) {
        spawn_projectile(state, ProjectileKind::Bullet, Vec2::new(1400.0, 0.0), 900.0);
    }
}

/// Area blast: immediate destruction of the nearest live obstacles. Rank
/// widens the blast: one target at rank 1, two at rank 2, the whole screen
/// from rank 3 up.
struct AreaBlastSkill;

impl AreaBlastSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::AreaBlast,
        class: SkillClass::Instant,
        energy_cost: 30.0,
        cooldown_ms: 12_000.0,
        base_duration_ms: 0.0,
    };

    fn targets_at(level: u8) -> usize {
        match level {
            1 => 1,
            2 => 2,
            _ => usize::MAX,
        }
    }
}

impl Skill for AreaBlastSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        let budget = Self::targets_at(level);
        // Spawn order is distance order: obstacles only ever move toward the
        // player, so the front of the list is the nearest.
        let ids: Vec<u32> = state
            .obstacles
            .iter()
            .filter(|o| o.is_live())
            .take(budget)
            .map(|o| o.id)
            .collect();
        for id in ids {
            destroy_obstacle(state, id, DestructionCause::AreaBlast);
        }
    }
}

/// Persistent fire aura. Duration doubles as the continuous-drain deadline;
/// the energy step empties the pool exactly when the aura ends.
struct FireAuraSkill;

impl FireAuraSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::FireAura,
        class: SkillClass::Sustained,
        energy_cost: 10.0,
        cooldown_ms: 15_000.0,
        base_duration_ms: 4000.0,
    };
}

impl Skill for FireAuraSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn duration_at(&self, level: u8) -> f32 {
        let mut duration = Self::SPEC.base_duration_ms;
        if level >= 2 {
            duration *= 1.5;
        }
        if level >= 3 {
            duration *= 1.2;
        }
        duration
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        state.effects.aura_ms = self.duration_at(level);
    }
}

/// Ignite the current obstacle: it burns for a randomized window, then
/// self-destructs as an incineration. Burning obstacles tumble toward the
/// player faster than the rest of the world.
struct IgniteSkill;

impl IgniteSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::Ignite,
        class: SkillClass::Instant,
        energy_cost: 14.0,
        cooldown_ms: 4000.0,
        base_duration_ms: 0.0,
    };
    /// Per-entity multiplier while burning, on top of the global one
    const BURN_SPEED_MULT: f32 = 1.25;
}

impl Skill for IgniteSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, _level: u8) {
        let burn_ms = state.rng.random_range(BURNOUT_MIN_MS..BURNOUT_MAX_MS);
        if let Some(obstacle) = state.current_obstacle_mut() {
            if obstacle.phase == ObstaclePhase::Active {
                obstacle.phase = ObstaclePhase::Burning {
                    remaining_ms: burn_ms,
                };
                obstacle.speed_mult = Self::BURN_SPEED_MULT;
            }
        }
    }
}

pub fn register(registry: &mut SkillRegistry) {
    registry.register(Box::new(FireballSkill));
    registry.register(Box::new(BottleTossSkill));
    registry.register(Box::new(BulletSkill));
    registry.register(Box::new(AreaBlastSkill));
    registry.register(Box::new(FireAuraSkill));
    registry.register(Box::new(IgniteSkill));
}
