//! Deterministic runner simulation
//!
//! Everything observable flows from `(seed, tick sequence)`: the RNG is
//! seeded per run and all randomness (spawn rolls, decoy substitution,
//! burnout windows) draws from it in tick order. Two clocks coexist and must
//! not be mixed: ability/effect countdowns run on accumulated simulated time
//! and freeze under pause; cooldowns run on the caller's wall clock and keep
//! expiring through a pause.

pub mod collision;
pub mod cooldown;
pub mod energy;
pub mod skills;
pub mod state;
pub mod tick;
pub mod track;

pub use collision::Resolution;
pub use cooldown::CooldownTracker;
pub use energy::EnergyPool;
pub use skills::{Skill, SkillClass, SkillKey, SkillRegistry, SkillSpec};
pub use state::{
    ActiveEffects, Booster, BoosterKind, JumpState, Obstacle, ObstacleKind, ObstaclePhase,
    PlayerStats, Projectile, ProjectileKind, SimulationState,
};
pub use tick::tick;
pub use track::{AutoJumpWindow, ScheduledEvent, Segment, Track, TrackDataError};
