//! Movement-class skills
//!
//! These occupy the exclusive jump slot. Most share the same life cycle
//! (write a `JumpState` variant, count its duration down, clear the slot at
//! zero) and go through the generic [`MovementSkill`]; abilities with
//! mid-flight sub-events get their own implementation.

use super::{Skill, SkillClass, SkillKey, SkillRegistry, SkillSpec};
use crate::config::DifficultyConfig;
use crate::sim::state::{JumpState, SimulationState};

/// Shared countdown step for whichever movement ability holds the slot.
/// Clears the slot exactly once, on the tick the countdown crosses zero.
fn advance_jump(state: &mut SimulationState, key: SkillKey, dt_ms: f32) {
    if state.jump.skill_key() != Some(key) {
        return;
    }
    if let Some(remaining) = state.jump.remaining_mut() {
        *remaining -= dt_ms;
        if *remaining <= 0.0 {
            state.jump = JumpState::None;
        }
    }
}

/// A movement ability with no sub-events: one variant, one countdown
struct MovementSkill {
    spec: SkillSpec,
    make: fn(total_ms: f32) -> JumpState,
}

impl Skill for MovementSkill {
    fn spec(&self) -> SkillSpec {
        self.spec
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        state.jump = (self.make)(self.duration_at(level));
    }

    fn update(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, dt_ms: f32) {
        advance_jump(state, self.spec.key, dt_ms);
    }
}

fn movement_spec(key: SkillKey, energy_cost: f32, cooldown_ms: f64, duration_ms: f32) -> SkillSpec {
    SkillSpec {
        key,
        class: SkillClass::Movement,
        energy_cost,
        cooldown_ms,
        base_duration_ms: duration_ms,
    }
}

/// Double jump: a second impulse partway through extends the flight.
/// The impulse is a time-until-subevent countdown, so it stays subject to
/// pause and fires exactly once.
struct DoubleJumpSkill;

impl DoubleJumpSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::DoubleJump,
        class: SkillClass::Movement,
        energy_cost: 14.0,
        cooldown_ms: 3000.0,
        base_duration_ms: 700.0,
    };
}

impl Skill for DoubleJumpSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        let total = self.duration_at(level);
        state.jump = JumpState::DoubleJump {
            remaining_ms: total,
            total_ms: total,
            boost_in_ms: total * 0.45,
        };
    }

    fn update(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, dt_ms: f32) {
        if let JumpState::DoubleJump {
            remaining_ms,
            total_ms,
            boost_in_ms,
        } = &mut state.jump
        {
            if *boost_in_ms > 0.0 {
                *boost_in_ms -= dt_ms;
                if *boost_in_ms <= 0.0 {
                    // Second impulse: stretch the remaining flight
                    *remaining_ms = (*remaining_ms + *total_ms * 0.25).min(*total_ms);
                    *boost_in_ms = -1.0;
                }
            }
        }
        advance_jump(state, SkillKey::DoubleJump, dt_ms);
    }
}

/// Ground pound: rise, slam, recover. The impact moment latches `triggered`
/// when progress passes the descending half; the resolver keys off that
/// same midpoint.
struct GroundPoundSkill;

impl GroundPoundSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::GroundPound,
        class: SkillClass::Movement,
        energy_cost: 20.0,
        cooldown_ms: 5000.0,
        base_duration_ms: 1000.0,
    };
}

impl Skill for GroundPoundSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        let total = self.duration_at(level);
        state.jump = JumpState::GroundPound {
            remaining_ms: total,
            total_ms: total,
            triggered: false,
        };
    }

    fn update(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, dt_ms: f32) {
        advance_jump(state, SkillKey::GroundPound, dt_ms);
        let progress = state.jump.progress();
        if let JumpState::GroundPound { triggered, .. } = &mut state.jump {
            if !*triggered && progress >= 0.5 {
                *triggered = true;
            }
        }
    }
}

/// Pogo chain: one activation, several bounces. Each bounce is a sub-event
/// countdown rather than a timer.
struct PogoChainSkill;

impl PogoChainSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::PogoChain,
        class: SkillClass::Movement,
        energy_cost: 22.0,
        cooldown_ms: 7000.0,
        base_duration_ms: 1600.0,
    };
    const BOUNCES: u8 = 3;
}

impl Skill for PogoChainSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        let total = self.duration_at(level);
        let interval = total / (Self::BOUNCES as f32 + 1.0);
        state.jump = JumpState::PogoChain {
            remaining_ms: total,
            total_ms: total,
            bounces_left: Self::BOUNCES,
            next_bounce_in_ms: interval,
        };
    }

    fn update(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, dt_ms: f32) {
        if let JumpState::PogoChain {
            total_ms,
            bounces_left,
            next_bounce_in_ms,
            ..
        } = &mut state.jump
        {
            if *bounces_left > 0 {
                *next_bounce_in_ms -= dt_ms;
                if *next_bounce_in_ms <= 0.0 {
                    *bounces_left -= 1;
                    *next_bounce_in_ms = *total_ms / (Self::BOUNCES as f32 + 1.0);
                }
            }
        }
        advance_jump(state, SkillKey::PogoChain, dt_ms);
    }
}

/// Super jump: the ranked ladder. Effects accumulate — a level 3 jump
/// carries the level 2 duration stretch and adds the cost discount on top.
struct SuperJumpSkill;

impl SuperJumpSkill {
    const SPEC: SkillSpec = SkillSpec {
        key: SkillKey::SuperJump,
        class: SkillClass::Movement,
        energy_cost: 18.0,
        cooldown_ms: 6000.0,
        base_duration_ms: 800.0,
    };
}

impl Skill for SuperJumpSkill {
    fn spec(&self) -> SkillSpec {
        Self::SPEC
    }

    fn duration_at(&self, level: u8) -> f32 {
        let mut duration = Self::SPEC.base_duration_ms;
        if level >= 2 {
            duration *= 1.25;
        }
        if level >= 3 {
            duration *= 1.15;
        }
        duration
    }

    fn cost_at(&self, level: u8) -> f32 {
        let mut cost = Self::SPEC.energy_cost;
        if level >= 3 {
            cost *= 0.8;
        }
        cost
    }

    fn activate(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, level: u8) {
        let total = self.duration_at(level);
        state.jump = JumpState::SuperJump {
            remaining_ms: total,
            total_ms: total,
        };
    }

    fn update(&self, state: &mut SimulationState, _cfg: &DifficultyConfig, dt_ms: f32) {
        advance_jump(state, SkillKey::SuperJump, dt_ms);
    }
}

pub fn register(registry: &mut SkillRegistry) {
    use SkillKey::*;

    let simple: &[(SkillKey, f32, f64, f32, fn(f32) -> JumpState)] = &[
        (Hurdle, 8.0, 0.0, 500.0, |t| JumpState::Hurdle { remaining_ms: t, total_ms: t }),
        (LongJump, 12.0, 1500.0, 800.0, |t| JumpState::LongJump { remaining_ms: t, total_ms: t }),
        (BackFlip, 12.0, 2000.0, 650.0, |t| JumpState::BackFlip { remaining_ms: t, total_ms: t }),
        (FrontFlip, 12.0, 2000.0, 650.0, |t| JumpState::FrontFlip { remaining_ms: t, total_ms: t }),
        (Corkscrew, 15.0, 2500.0, 750.0, |t| JumpState::Corkscrew { remaining_ms: t, total_ms: t }),
        (Slide, 6.0, 800.0, 600.0, |t| JumpState::Slide { remaining_ms: t, total_ms: t }),
        (Dash, 10.0, 2000.0, 450.0, |t| JumpState::Dash { remaining_ms: t, total_ms: t }),
        (Vault, 9.0, 1200.0, 550.0, |t| JumpState::Vault { remaining_ms: t, total_ms: t }),
        (RollingFire, 25.0, 9000.0, 900.0, |t| JumpState::RollingFire { remaining_ms: t, total_ms: t }),
        (Somersault, 11.0, 1800.0, 700.0, |t| JumpState::Somersault { remaining_ms: t, total_ms: t }),
        (HighBounce, 16.0, 3500.0, 850.0, |t| JumpState::HighBounce { remaining_ms: t, total_ms: t }),
        (SplitLeap, 13.0, 2200.0, 700.0, |t| JumpState::SplitLeap { remaining_ms: t, total_ms: t }),
        (Glide, 18.0, 5000.0, 1400.0, |t| JumpState::Glide { remaining_ms: t, total_ms: t }),
        (RocketHop, 24.0, 8000.0, 900.0, |t| JumpState::RocketHop { remaining_ms: t, total_ms: t }),
        (Moonstep, 17.0, 5000.0, 1600.0, |t| JumpState::Moonstep { remaining_ms: t, total_ms: t }),
        (SkyDive, 20.0, 6000.0, 1100.0, |t| JumpState::SkyDive { remaining_ms: t, total_ms: t }),
        (Cartwheel, 19.0, 5500.0, 750.0, |t| JumpState::Cartwheel { remaining_ms: t, total_ms: t }),
        (HandSpring, 12.0, 2000.0, 600.0, |t| JumpState::HandSpring { remaining_ms: t, total_ms: t }),
        (TuckRoll, 7.0, 1000.0, 500.0, |t| JumpState::TuckRoll { remaining_ms: t, total_ms: t }),
        (SpiralLeap, 14.0, 2500.0, 800.0, |t| JumpState::SpiralLeap { remaining_ms: t, total_ms: t }),
        (PhaseStep, 21.0, 7000.0, 400.0, |t| JumpState::PhaseStep { remaining_ms: t, total_ms: t }),
        (Springboard, 15.0, 3000.0, 900.0, |t| JumpState::Springboard { remaining_ms: t, total_ms: t }),
        (ShadowSprint, 16.0, 4500.0, 1000.0, |t| JumpState::ShadowSprint { remaining_ms: t, total_ms: t }),
        (Blitz, 26.0, 10_000.0, 800.0, |t| JumpState::Blitz { remaining_ms: t, total_ms: t }),
    ];

    for &(key, cost, cooldown, duration, make) in simple {
        registry.register(Box::new(MovementSkill {
            spec: movement_spec(key, cost, cooldown, duration),
            make,
        }));
    }

    registry.register(Box::new(DoubleJumpSkill));
    registry.register(Box::new(GroundPoundSkill));
    registry.register(Box::new(PogoChainSkill));
    registry.register(Box::new(SuperJumpSkill));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::skills::try_activate;

    fn setup() -> (SimulationState, DifficultyConfig, SkillRegistry) {
        let mut state = SimulationState::new(9, 100.0);
        state.running = true;
        (state, DifficultyConfig::default(), SkillRegistry::new())
    }

    #[test]
    fn test_countdown_clears_slot_once() {
        let (mut state, cfg, registry) = setup();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::Hurdle, 0.0));

        registry.update_all(&mut state, &cfg, 499.0);
        assert!(state.jump.is_active());
        registry.update_all(&mut state, &cfg, 1.0);
        assert_eq!(state.jump, JumpState::None);
        // Further updates stay a no-op
        registry.update_all(&mut state, &cfg, 16.0);
        assert_eq!(state.jump, JumpState::None);
    }

    #[test]
    fn test_double_jump_impulse_fires_once() {
        let (mut state, cfg, registry) = setup();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::DoubleJump, 0.0));

        // Walk past the sub-event point in small steps
        for _ in 0..40 {
            registry.update_all(&mut state, &cfg, 10.0);
        }
        if let JumpState::DoubleJump { boost_in_ms, .. } = state.jump {
            assert_eq!(boost_in_ms, -1.0);
        } else {
            panic!("double jump ended early: {:?}", state.jump);
        }
    }

    #[test]
    fn test_ground_pound_triggers_at_midpoint() {
        let (mut state, cfg, registry) = setup();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::GroundPound, 0.0));

        registry.update_all(&mut state, &cfg, 400.0);
        assert!(matches!(
            state.jump,
            JumpState::GroundPound { triggered: false, .. }
        ));
        registry.update_all(&mut state, &cfg, 200.0);
        assert!(matches!(
            state.jump,
            JumpState::GroundPound { triggered: true, .. }
        ));
    }

    #[test]
    fn test_pogo_chain_consumes_bounces() {
        let (mut state, cfg, registry) = setup();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::PogoChain, 0.0));

        // 1600ms total, bounce every 400ms, one bounce fires per update
        registry.update_all(&mut state, &cfg, 450.0);
        if let JumpState::PogoChain { bounces_left, .. } = state.jump {
            assert_eq!(bounces_left, 2);
        } else {
            panic!("pogo ended early");
        }
        registry.update_all(&mut state, &cfg, 400.0);
        registry.update_all(&mut state, &cfg, 400.0);
        if let JumpState::PogoChain { bounces_left, .. } = state.jump {
            assert_eq!(bounces_left, 0);
        } else {
            panic!("pogo ended early");
        }
    }

    #[test]
    fn test_super_jump_ladder_is_cumulative() {
        let skill = SuperJumpSkill;
        let d1 = skill.duration_at(1);
        let d2 = skill.duration_at(2);
        let d3 = skill.duration_at(3);
        // Monotonic, and level 3 includes the level 2 stretch
        assert!(d1 < d2 && d2 < d3);
        assert!((d2 - d1 * 1.25).abs() < 1e-3);
        assert!((d3 - d1 * 1.25 * 1.15).abs() < 1e-3);

        let c1 = skill.cost_at(1);
        let c2 = skill.cost_at(2);
        let c3 = skill.cost_at(3);
        assert_eq!(c1, c2);
        assert!((c3 - c1 * 0.8).abs() < 1e-3);
    }
}
