//! The skill framework
//!
//! Every one of the ~40 skills implements the same contract: `activate`,
//! `update`, `draw`. The registry owns one boxed implementation per key and
//! the tick loop calls `update` on all of them every tick; each skill decides
//! for itself whether it is currently relevant.
//!
//! Activation is a guarded no-op: wrong mode, occupied movement slot, active
//! cooldown, or insufficient energy all refuse the mutation silently. User
//! feedback on refusal is the UI collaborator's job.

pub mod combat;
pub mod movement;
pub mod support;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::state::SimulationState;
use crate::config::DifficultyConfig;
use crate::events::GameEvent;

/// Stable identifier for every skill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkillKey {
    // Movement-class (occupy the exclusive jump slot)
    Hurdle,
    LongJump,
    DoubleJump,
    BackFlip,
    FrontFlip,
    Corkscrew,
    GroundPound,
    Slide,
    Dash,
    Vault,
    RollingFire,
    Somersault,
    HighBounce,
    SplitLeap,
    Glide,
    RocketHop,
    Moonstep,
    PogoChain,
    SkyDive,
    Cartwheel,
    HandSpring,
    TuckRoll,
    SpiralLeap,
    PhaseStep,
    Springboard,
    SuperJump,
    ShadowSprint,
    Blitz,
    // Orthogonal skills (run alongside the jump slot)
    FireAura,
    Invincibility,
    Shield,
    Fireball,
    BottleToss,
    Bullet,
    AreaBlast,
    Ignite,
    EnergySurge,
    Overclock,
    TimeDilation,
    Magnet,
}

/// Which activation rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillClass {
    /// Mutually exclusive: refuses while another movement ability runs
    Movement,
    /// Fires immediately; no ongoing countdown of its own
    Instant,
    /// Keeps a timed effect running after activation
    Sustained,
}

/// Static descriptor for a skill
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkillSpec {
    pub key: SkillKey,
    pub class: SkillClass,
    /// Flat activation cost at level 1 (continuous drains are separate)
    pub energy_cost: f32,
    /// Wall-clock cooldown; 0 = none
    pub cooldown_ms: f64,
    /// Ability duration at level 1 (simulated ms); 0 for instants
    pub base_duration_ms: f32,
}

/// The uniform polymorphic contract every skill implements.
///
/// Level scaling must be cumulative and monotonic: level `k` includes every
/// effect of levels below `k`.
pub trait Skill {
    fn spec(&self) -> SkillSpec;

    /// Activation cost at a ladder rank
    fn cost_at(&self, _level: u8) -> f32 {
        self.spec().energy_cost
    }

    /// Ability duration at a ladder rank
    fn duration_at(&self, _level: u8) -> f32 {
        self.spec().base_duration_ms
    }

    /// Apply the skill's effect. Guards have already passed; energy and
    /// cooldown are already committed.
    fn activate(&self, state: &mut SimulationState, cfg: &DifficultyConfig, level: u8);

    /// Advance the skill's countdowns by `dt_ms` of simulated time. Called
    /// every tick on every skill; irrelevant skills do nothing.
    fn update(&self, _state: &mut SimulationState, _cfg: &DifficultyConfig, _dt_ms: f32) {}

    /// Visual hook. The engine invokes it so timing stays centralized, but
    /// performs no rendering itself.
    fn draw(&self, _state: &SimulationState) {}
}

/// Registry mapping keys to implementations.
///
/// Skills are stored in registration order and always iterated that way —
/// update order is part of determinism.
pub struct SkillRegistry {
    skills: Vec<Box<dyn Skill>>,
    index: HashMap<SkillKey, usize>,
}

impl SkillRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            skills: Vec::new(),
            index: HashMap::new(),
        };
        movement::register(&mut registry);
        combat::register(&mut registry);
        support::register(&mut registry);
        registry
    }

    pub fn register(&mut self, skill: Box<dyn Skill>) {
        let key = skill.spec().key;
        debug_assert!(!self.index.contains_key(&key), "duplicate skill {key:?}");
        self.index.insert(key, self.skills.len());
        self.skills.push(skill);
    }

    pub fn get(&self, key: SkillKey) -> Option<&dyn Skill> {
        self.index.get(&key).map(|&i| self.skills[i].as_ref())
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Tick every skill, in registration order
    pub fn update_all(&self, state: &mut SimulationState, cfg: &DifficultyConfig, dt_ms: f32) {
        for skill in &self.skills {
            skill.update(state, cfg, dt_ms);
        }
    }

    /// Invoke every skill's draw hook against the current snapshot
    pub fn draw_all(&self, state: &SimulationState) {
        for skill in &self.skills {
            skill.draw(state);
        }
    }
}

impl Default for SkillRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Attempt to activate a skill. Returns whether the activation took effect;
/// a `false` leaves the state untouched.
pub fn try_activate(
    state: &mut SimulationState,
    cfg: &DifficultyConfig,
    registry: &SkillRegistry,
    key: SkillKey,
    now_ms: f64,
) -> bool {
    if !state.running || state.paused || state.game_over {
        return false;
    }
    let Some(skill) = registry.get(key) else {
        return false;
    };
    let spec = skill.spec();

    // The movement slot is exclusive; a second movement skill must wait
    if spec.class == SkillClass::Movement && state.jump.is_active() {
        return false;
    }
    if !state.cooldowns.is_ready(key, now_ms) {
        return false;
    }
    let level = state.stats.skill_level(key);
    let cost = skill.cost_at(level);
    if !state.energy.can_afford(cost) {
        return false;
    }

    state.energy.drain(cost);
    // Cooldown starts at the press, not at ability end
    if spec.cooldown_ms > 0.0 {
        state.cooldowns.trigger(key, now_ms, spec.cooldown_ms);
    }
    skill.activate(state, cfg, level);
    state.push_event(GameEvent::SkillActivated { key });
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::JumpState;

    fn running_state() -> SimulationState {
        let mut state = SimulationState::new(5, 100.0);
        state.running = true;
        state
    }

    #[test]
    fn test_registry_covers_all_keys() {
        let registry = SkillRegistry::new();
        assert_eq!(registry.len(), 40);
        for key in [
            SkillKey::Hurdle,
            SkillKey::GroundPound,
            SkillKey::RollingFire,
            SkillKey::FireAura,
            SkillKey::AreaBlast,
            SkillKey::Magnet,
        ] {
            assert!(registry.get(key).is_some(), "{key:?} missing");
        }
    }

    #[test]
    fn test_activation_refused_when_not_running() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = SimulationState::new(5, 100.0);
        assert!(!try_activate(&mut state, &cfg, &registry, SkillKey::Hurdle, 0.0));
        assert!(!state.jump.is_active());
        assert_eq!(state.energy.current(), 100.0);
    }

    #[test]
    fn test_activation_refused_when_paused() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = running_state();
        state.paused = true;
        assert!(!try_activate(&mut state, &cfg, &registry, SkillKey::Hurdle, 0.0));
    }

    #[test]
    fn test_movement_slot_is_exclusive() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = running_state();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::Hurdle, 0.0));
        assert!(state.jump.is_active());

        let energy_before = state.energy.current();
        assert!(!try_activate(&mut state, &cfg, &registry, SkillKey::LongJump, 0.0));
        assert_eq!(state.jump.skill_key(), Some(SkillKey::Hurdle));
        assert_eq!(state.energy.current(), energy_before);
    }

    #[test]
    fn test_orthogonal_skill_allowed_during_movement() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = running_state();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::Hurdle, 0.0));
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::Shield, 0.0));
        assert!(state.effects.shield);
    }

    #[test]
    fn test_insufficient_energy_is_silent_noop() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = running_state();
        state.energy.set(0.5);
        assert!(!try_activate(&mut state, &cfg, &registry, SkillKey::Hurdle, 0.0));
        assert!(!state.jump.is_active());
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_cooldown_starts_at_activation() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = running_state();
        let spec = registry.get(SkillKey::Fireball).unwrap().spec();
        assert!(spec.cooldown_ms > 0.0);

        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::Fireball, 1000.0));
        // Refused for all now' < activation + C
        assert!(!try_activate(
            &mut state,
            &cfg,
            &registry,
            SkillKey::Fireball,
            1000.0 + spec.cooldown_ms - 0.1
        ));
        // Succeeds exactly at activation + C
        assert!(try_activate(
            &mut state,
            &cfg,
            &registry,
            SkillKey::Fireball,
            1000.0 + spec.cooldown_ms
        ));
    }

    #[test]
    fn test_movement_slot_frees_after_duration() {
        let registry = SkillRegistry::new();
        let cfg = DifficultyConfig::default();
        let mut state = running_state();
        assert!(try_activate(&mut state, &cfg, &registry, SkillKey::Slide, 0.0));
        let (_, total) = state.jump.timer().unwrap();

        registry.update_all(&mut state, &cfg, total / 2.0);
        assert!(state.jump.is_active());
        registry.update_all(&mut state, &cfg, total);
        assert_eq!(state.jump, JumpState::None);
    }
}
