//! Game state and core simulation types
//!
//! All state the engine mutates lives here, in one serializable aggregate.
//! Outside code reads it through `Engine::snapshot` and never writes a field
//! directly; every mutation goes through a named method so clamping and
//! event emission happen at a single seam.

use std::collections::HashMap;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::cooldown::CooldownTracker;
use super::energy::EnergyPool;
use super::skills::SkillKey;
use crate::consts::*;
use crate::events::{DestructionCause, GameEvent};

/// Obstacle visual kinds. Height drives the standard collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Boulder,
    Log,
    Spikes,
    Crate,
    /// Visually disguised as a normal obstacle; never counts toward
    /// destruction stats or streaks.
    Decoy,
}

impl ObstacleKind {
    /// Obstacle height above the ground line (canvas units)
    pub fn height(&self) -> f32 {
        match self {
            ObstacleKind::Boulder => 42.0,
            ObstacleKind::Log => 30.0,
            ObstacleKind::Spikes => 50.0,
            ObstacleKind::Crate => 58.0,
            ObstacleKind::Decoy => 42.0, // disguised as a boulder
        }
    }

    /// Decoys are cosmetic: destroying one never increments counters
    pub fn counts_for_stats(&self) -> bool {
        *self != ObstacleKind::Decoy
    }
}

/// Lifecycle phase of an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ObstaclePhase {
    Active,
    /// Ignited: self-destroys when the countdown expires (simulated ms)
    Burning { remaining_ms: f32 },
    /// Terminal destruction animation before removal (simulated ms)
    Destroyed { fade_ms: f32 },
}

/// A single obstacle scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Scalar track offset (canvas x)
    pub x: f32,
    /// Guards the hit counter: one obstacle deals damage at most once
    pub has_been_hit: bool,
    pub phase: ObstaclePhase,
    /// Per-entity speed multiplier, multiplicative with the global one
    pub speed_mult: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind) -> Self {
        Self {
            id,
            kind,
            x: SPAWN_X,
            has_been_hit: false,
            phase: ObstaclePhase::Active,
            speed_mult: 1.0,
        }
    }

    /// Canvas y of the obstacle's top edge
    pub fn top_y(&self) -> f32 {
        GROUND_Y - self.kind.height()
    }

    /// Still a live collision participant (not yet in terminal animation)
    pub fn is_live(&self) -> bool {
        !matches!(self.phase, ObstaclePhase::Destroyed { .. })
    }
}

/// Speed pickup kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoosterKind {
    Accelerator,
    Decelerator,
}

/// Booster top edge above ground (canvas units)
pub const BOOSTER_HEIGHT: f32 = 48.0;

/// An accelerator/decelerator pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booster {
    pub id: u32,
    pub kind: BoosterKind,
    pub x: f32,
    /// Flipped immediately on collection; makes collection idempotent
    pub collected: bool,
    /// Spawned by a scheduled proximity event rather than a frequency roll
    pub from_event: bool,
}

impl Booster {
    pub fn new(id: u32, kind: BoosterKind) -> Self {
        Self {
            id,
            kind,
            x: SPAWN_X,
            collected: false,
            from_event: false,
        }
    }

    pub fn top_y(&self) -> f32 {
        GROUND_Y - BOOSTER_HEIGHT
    }
}

/// Player-launched projectile kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Fireball,
    Bottle,
    Bullet,
}

/// A projectile owned by the tick that advances it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Lifetime bound (simulated ms)
    pub ttl_ms: f32,
}

/// The mutually-exclusive movement slot.
///
/// At most one movement ability is ever active; the type makes "two at once"
/// unrepresentable. Every countdown here is simulated time (accumulated dt)
/// and freezes under pause.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum JumpState {
    #[default]
    None,
    Hurdle { remaining_ms: f32, total_ms: f32 },
    LongJump { remaining_ms: f32, total_ms: f32 },
    /// Second impulse fires when `boost_in_ms` crosses zero
    DoubleJump { remaining_ms: f32, total_ms: f32, boost_in_ms: f32 },
    BackFlip { remaining_ms: f32, total_ms: f32 },
    FrontFlip { remaining_ms: f32, total_ms: f32 },
    Corkscrew { remaining_ms: f32, total_ms: f32 },
    /// `triggered` latches once the slam sub-event has fired
    GroundPound { remaining_ms: f32, total_ms: f32, triggered: bool },
    Slide { remaining_ms: f32, total_ms: f32 },
    Dash { remaining_ms: f32, total_ms: f32 },
    Vault { remaining_ms: f32, total_ms: f32 },
    /// In-flight travel with its own narrow destroy window
    RollingFire { remaining_ms: f32, total_ms: f32 },
    Somersault { remaining_ms: f32, total_ms: f32 },
    HighBounce { remaining_ms: f32, total_ms: f32 },
    SplitLeap { remaining_ms: f32, total_ms: f32 },
    Glide { remaining_ms: f32, total_ms: f32 },
    RocketHop { remaining_ms: f32, total_ms: f32 },
    Moonstep { remaining_ms: f32, total_ms: f32 },
    PogoChain {
        remaining_ms: f32,
        total_ms: f32,
        bounces_left: u8,
        next_bounce_in_ms: f32,
    },
    SkyDive { remaining_ms: f32, total_ms: f32 },
    Cartwheel { remaining_ms: f32, total_ms: f32 },
    HandSpring { remaining_ms: f32, total_ms: f32 },
    TuckRoll { remaining_ms: f32, total_ms: f32 },
    SpiralLeap { remaining_ms: f32, total_ms: f32 },
    PhaseStep { remaining_ms: f32, total_ms: f32 },
    Springboard { remaining_ms: f32, total_ms: f32 },
    SuperJump { remaining_ms: f32, total_ms: f32 },
    ShadowSprint { remaining_ms: f32, total_ms: f32 },
    Blitz { remaining_ms: f32, total_ms: f32 },
}

impl JumpState {
    pub fn is_active(&self) -> bool {
        !matches!(self, JumpState::None)
    }

    /// The skill key occupying the slot, if any
    pub fn skill_key(&self) -> Option<SkillKey> {
        use JumpState::*;
        Some(match self {
            None => return Option::None,
            Hurdle { .. } => SkillKey::Hurdle,
            LongJump { .. } => SkillKey::LongJump,
            DoubleJump { .. } => SkillKey::DoubleJump,
            BackFlip { .. } => SkillKey::BackFlip,
            FrontFlip { .. } => SkillKey::FrontFlip,
            Corkscrew { .. } => SkillKey::Corkscrew,
            GroundPound { .. } => SkillKey::GroundPound,
            Slide { .. } => SkillKey::Slide,
            Dash { .. } => SkillKey::Dash,
            Vault { .. } => SkillKey::Vault,
            RollingFire { .. } => SkillKey::RollingFire,
            Somersault { .. } => SkillKey::Somersault,
            HighBounce { .. } => SkillKey::HighBounce,
            SplitLeap { .. } => SkillKey::SplitLeap,
            Glide { .. } => SkillKey::Glide,
            RocketHop { .. } => SkillKey::RocketHop,
            Moonstep { .. } => SkillKey::Moonstep,
            PogoChain { .. } => SkillKey::PogoChain,
            SkyDive { .. } => SkillKey::SkyDive,
            Cartwheel { .. } => SkillKey::Cartwheel,
            HandSpring { .. } => SkillKey::HandSpring,
            TuckRoll { .. } => SkillKey::TuckRoll,
            SpiralLeap { .. } => SkillKey::SpiralLeap,
            PhaseStep { .. } => SkillKey::PhaseStep,
            Springboard { .. } => SkillKey::Springboard,
            SuperJump { .. } => SkillKey::SuperJump,
            ShadowSprint { .. } => SkillKey::ShadowSprint,
            Blitz { .. } => SkillKey::Blitz,
        })
    }

    /// (remaining, total) countdown of the active ability
    pub fn timer(&self) -> Option<(f32, f32)> {
        use JumpState::*;
        match *self {
            None => Option::None,
            Hurdle { remaining_ms, total_ms }
            | LongJump { remaining_ms, total_ms }
            | DoubleJump { remaining_ms, total_ms, .. }
            | BackFlip { remaining_ms, total_ms }
            | FrontFlip { remaining_ms, total_ms }
            | Corkscrew { remaining_ms, total_ms }
            | GroundPound { remaining_ms, total_ms, .. }
            | Slide { remaining_ms, total_ms }
            | Dash { remaining_ms, total_ms }
            | Vault { remaining_ms, total_ms }
            | RollingFire { remaining_ms, total_ms }
            | Somersault { remaining_ms, total_ms }
            | HighBounce { remaining_ms, total_ms }
            | SplitLeap { remaining_ms, total_ms }
            | Glide { remaining_ms, total_ms }
            | RocketHop { remaining_ms, total_ms }
            | Moonstep { remaining_ms, total_ms }
            | PogoChain { remaining_ms, total_ms, .. }
            | SkyDive { remaining_ms, total_ms }
            | Cartwheel { remaining_ms, total_ms }
            | HandSpring { remaining_ms, total_ms }
            | TuckRoll { remaining_ms, total_ms }
            | SpiralLeap { remaining_ms, total_ms }
            | PhaseStep { remaining_ms, total_ms }
            | Springboard { remaining_ms, total_ms }
            | SuperJump { remaining_ms, total_ms }
            | ShadowSprint { remaining_ms, total_ms }
            | Blitz { remaining_ms, total_ms } => Some((remaining_ms, total_ms)),
        }
    }

    /// Mutable remaining-duration countdown of the active ability
    pub fn remaining_mut(&mut self) -> Option<&mut f32> {
        use JumpState::*;
        match self {
            None => Option::None,
            Hurdle { remaining_ms, .. }
            | LongJump { remaining_ms, .. }
            | DoubleJump { remaining_ms, .. }
            | BackFlip { remaining_ms, .. }
            | FrontFlip { remaining_ms, .. }
            | Corkscrew { remaining_ms, .. }
            | GroundPound { remaining_ms, .. }
            | Slide { remaining_ms, .. }
            | Dash { remaining_ms, .. }
            | Vault { remaining_ms, .. }
            | RollingFire { remaining_ms, .. }
            | Somersault { remaining_ms, .. }
            | HighBounce { remaining_ms, .. }
            | SplitLeap { remaining_ms, .. }
            | Glide { remaining_ms, .. }
            | RocketHop { remaining_ms, .. }
            | Moonstep { remaining_ms, .. }
            | PogoChain { remaining_ms, .. }
            | SkyDive { remaining_ms, .. }
            | Cartwheel { remaining_ms, .. }
            | HandSpring { remaining_ms, .. }
            | TuckRoll { remaining_ms, .. }
            | SpiralLeap { remaining_ms, .. }
            | PhaseStep { remaining_ms, .. }
            | Springboard { remaining_ms, .. }
            | SuperJump { remaining_ms, .. }
            | ShadowSprint { remaining_ms, .. }
            | Blitz { remaining_ms, .. } => Some(remaining_ms),
        }
    }

    /// Normalized progress through the ability, 0 at activation to 1 at end
    pub fn progress(&self) -> f32 {
        match self.timer() {
            Some((remaining, total)) if total > 0.0 => (1.0 - remaining / total).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    /// Peak lift of the ability's vertical profile (canvas units)
    fn peak_lift(&self) -> f32 {
        use JumpState::*;
        match self {
            None | Slide { .. } | Dash { .. } | TuckRoll { .. } | ShadowSprint { .. }
            | Blitz { .. } | PhaseStep { .. } => 0.0,
            Hurdle { .. } => 90.0,
            LongJump { .. } => 70.0,
            DoubleJump { .. } => 110.0,
            BackFlip { .. } | FrontFlip { .. } => 95.0,
            Corkscrew { .. } | SpiralLeap { .. } => 85.0,
            GroundPound { .. } => 100.0,
            Vault { .. } => 65.0,
            RollingFire { .. } => 55.0,
            Somersault { .. } | Cartwheel { .. } | HandSpring { .. } => 75.0,
            HighBounce { .. } | Springboard { .. } => 120.0,
            SplitLeap { .. } => 80.0,
            Glide { .. } | Moonstep { .. } => 70.0,
            RocketHop { .. } => 130.0,
            PogoChain { .. } => 85.0,
            SkyDive { .. } => 140.0,
            SuperJump { .. } => 150.0,
        }
    }

    /// Current lift above the ground line.
    ///
    /// Most abilities follow a sine arc; the slam, glide, and pogo families
    /// have their own profiles.
    pub fn lift(&self) -> f32 {
        use std::f32::consts::PI;
        let peak = self.peak_lift();
        if peak == 0.0 {
            return 0.0;
        }
        let p = self.progress();
        match self {
            // Rise fast, slam down, stay grounded for the recovery tail
            JumpState::GroundPound { .. } => {
                if p < 0.35 {
                    peak * (PI * p / 0.7).sin()
                } else if p < 0.6 {
                    peak * (1.0 - (p - 0.35) / 0.25)
                } else {
                    0.0
                }
            }
            // Rise, hold at altitude, descend late
            JumpState::Glide { .. } | JumpState::Moonstep { .. } => {
                if p < 0.25 {
                    peak * (p / 0.25)
                } else if p < 0.8 {
                    peak
                } else {
                    peak * (1.0 - (p - 0.8) / 0.2)
                }
            }
            // Repeated bounces within one activation
            JumpState::PogoChain { bounces_left, .. } => {
                let total_bounces = (*bounces_left as f32 + 1.0).max(1.0);
                let phase = (p * total_bounces).fract();
                peak * (PI * phase).sin()
            }
            _ => peak * (PI * p).sin(),
        }
    }

    /// Whether this movement ability destroys obstacles on contact.
    /// Rolling-fire and the ground pound have their own resolver branches.
    pub fn is_destructive(&self) -> bool {
        matches!(
            self,
            JumpState::Blitz { .. } | JumpState::RocketHop { .. } | JumpState::Cartwheel { .. }
        )
    }
}

/// Timed non-movement effects.
///
/// All countdowns are simulated ms. `aura_ms` doubles as the remaining time
/// to the continuous-drain deadline the energy economy targets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ActiveEffects {
    pub invincible_ms: f32,
    pub aura_ms: f32,
    /// One-shot consumable; cleared the first time it absorbs an obstacle
    pub shield: bool,
    pub accel_ms: f32,
    pub decel_ms: f32,
    /// Post-hit slowdown window
    pub hit_slow_ms: f32,
}

/// Maximum rank on any upgrade ladder
pub const MAX_SKILL_LEVEL: u8 = 5;

/// Monotonic per-player counters and upgrade ranks.
///
/// Totals and skill levels persist across runs (the unlock collaborator owns
/// them); streaks are per-run and reset with the run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    pub destroyed_by_fire: u32,
    pub destroyed_by_pound: u32,
    pub destroyed_by_projectile: u32,
    pub destroyed_by_skill: u32,
    pub destruction_streak: u32,
    pub best_destruction_streak: u32,
    pub ground_pound_streak: u32,
    pub best_ground_pound_streak: u32,
    pub boosters_collected: u32,
    pub milestones_banked: u32,
    skill_levels: HashMap<SkillKey, u8>,
}

impl PlayerStats {
    /// Current rank of a skill's upgrade ladder (1 when never upgraded)
    pub fn skill_level(&self, key: SkillKey) -> u8 {
        self.skill_levels.get(&key).copied().unwrap_or(1)
    }

    /// Set by the external unlock logic; clamped to the ladder range
    pub fn set_skill_level(&mut self, key: SkillKey, level: u8) {
        self.skill_levels.insert(key, level.clamp(1, MAX_SKILL_LEVEL));
    }

    /// Bookkeeping for a destroyed obstacle. Decoys never reach this point.
    pub fn record_destruction(&mut self, cause: DestructionCause) {
        match cause {
            DestructionCause::RollingFire
            | DestructionCause::Aura
            | DestructionCause::Burnout => {
                self.destroyed_by_fire += 1;
                self.destruction_streak += 1;
                self.best_destruction_streak =
                    self.best_destruction_streak.max(self.destruction_streak);
                // An incineration breaks a pound chain
                self.ground_pound_streak = 0;
            }
            DestructionCause::GroundPound => {
                self.destroyed_by_pound += 1;
                self.ground_pound_streak += 1;
                self.best_ground_pound_streak =
                    self.best_ground_pound_streak.max(self.ground_pound_streak);
            }
            DestructionCause::Projectile => {
                self.destroyed_by_projectile += 1;
            }
            // A destructive movement clear chains like an incineration
            DestructionCause::Movement => {
                self.destroyed_by_skill += 1;
                self.destruction_streak += 1;
                self.best_destruction_streak =
                    self.best_destruction_streak.max(self.destruction_streak);
                self.ground_pound_streak = 0;
            }
            DestructionCause::Shield | DestructionCause::AreaBlast => {
                self.destroyed_by_skill += 1;
            }
        }
    }

    /// A missed obstacle is worse than a clean avoidance: both streaks reset
    pub fn record_miss(&mut self) {
        self.destruction_streak = 0;
        self.ground_pound_streak = 0;
    }

    /// A damaging hit resets every streak
    pub fn record_hit(&mut self) {
        self.destruction_streak = 0;
        self.ground_pound_streak = 0;
    }

    fn reset_run_scoped(&mut self) {
        self.destruction_streak = 0;
        self.ground_pound_streak = 0;
    }
}

fn fresh_rng() -> Pcg32 {
    Pcg32::seed_from_u64(0)
}

/// Complete simulation state (deterministic given seed + tick sequence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; all spawn/decoy/burnout randomness flows through it
    #[serde(skip, default = "fresh_rng")]
    pub rng: Pcg32,

    // === Top-level mode ===
    pub running: bool,
    pub paused: bool,
    pub game_over: bool,
    /// "Zero hits this run", computed at game over
    pub victory: bool,

    // === Clocks ===
    /// Accumulated simulated time (ms); frozen under pause
    pub elapsed_ms: f64,
    /// Tick counter; spawn cadence keys off it
    pub frame: u64,

    // === Progression ===
    pub segment_index: usize,
    /// Progress through the current segment, crosses 1.0 at the boundary
    pub segment_progress: f32,
    /// Scripted jump assistance fires once per segment window
    pub auto_jump_armed: bool,

    // === Economy and effects ===
    pub energy: EnergyPool,
    pub cooldowns: CooldownTracker,
    pub jump: JumpState,
    pub effects: ActiveEffects,
    /// Resolved once per tick: hit penalty > decelerator > accelerator > base
    pub speed_multiplier: f32,
    /// Damaging hits this run
    pub hits: u32,

    // === Entities ===
    pub obstacles: Vec<Obstacle>,
    pub boosters: Vec<Booster>,
    pub projectiles: Vec<Projectile>,
    /// Parallel to the scheduled proximity events fed in at start
    pub proximity_spawned: Vec<bool>,

    pub stats: PlayerStats,

    /// Side-channel queue drained by the caller each tick
    #[serde(skip)]
    pub events: Vec<GameEvent>,

    next_id: u32,
}

impl SimulationState {
    pub fn new(seed: u64, energy_cap: f32) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            running: false,
            paused: false,
            game_over: false,
            victory: false,
            elapsed_ms: 0.0,
            frame: 0,
            segment_index: 0,
            segment_progress: 0.0,
            auto_jump_armed: true,
            energy: EnergyPool::full(energy_cap),
            cooldowns: CooldownTracker::default(),
            jump: JumpState::None,
            effects: ActiveEffects::default(),
            speed_multiplier: 1.0,
            hits: 0,
            obstacles: Vec::new(),
            boosters: Vec::new(),
            projectiles: Vec::new(),
            proximity_spawned: Vec::new(),
            stats: PlayerStats::default(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID (monotonic; list order stays spawn order)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Canvas y of the player's sprite top. The lowest extent is
    /// `player_y() + PLAYER_HEIGHT`.
    pub fn player_y(&self) -> f32 {
        GROUND_Y - PLAYER_HEIGHT - self.jump.lift()
    }

    pub fn airborne(&self) -> bool {
        self.jump.lift() > 0.0
    }

    /// First obstacle still participating in collision
    pub fn current_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.is_live())
    }

    pub fn current_obstacle_mut(&mut self) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.is_live())
    }

    /// Uncollected booster currently on screen
    pub fn current_booster_mut(&mut self) -> Option<&mut Booster> {
        self.boosters.iter_mut().find(|b| !b.collected)
    }

    /// Cancel all in-flight skills, clear entity lists, refill energy.
    /// Cooldowns are wall-clock and deliberately survive a reset.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.game_over = false;
        self.victory = false;
        self.paused = false;
        self.elapsed_ms = 0.0;
        self.frame = 0;
        self.segment_index = 0;
        self.segment_progress = 0.0;
        self.auto_jump_armed = true;
        self.energy.refill();
        self.jump = JumpState::None;
        self.effects = ActiveEffects::default();
        self.speed_multiplier = 1.0;
        self.hits = 0;
        self.obstacles.clear();
        self.boosters.clear();
        self.projectiles.clear();
        for flag in &mut self.proximity_spawned {
            *flag = false;
        }
        self.stats.reset_run_scoped();
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_state_exclusive_slot() {
        let mut state = SimulationState::new(1, 100.0);
        assert!(!state.jump.is_active());
        state.jump = JumpState::Hurdle {
            remaining_ms: 500.0,
            total_ms: 500.0,
        };
        assert!(state.jump.is_active());
        assert_eq!(state.jump.skill_key(), Some(SkillKey::Hurdle));
    }

    #[test]
    fn test_lift_profile_starts_and_ends_grounded() {
        for total in [400.0_f32, 900.0] {
            let start = JumpState::Hurdle {
                remaining_ms: total,
                total_ms: total,
            };
            let end = JumpState::Hurdle {
                remaining_ms: 0.0,
                total_ms: total,
            };
            assert!(start.lift().abs() < 1e-3);
            assert!(end.lift().abs() < 1e-3);
            let mid = JumpState::Hurdle {
                remaining_ms: total / 2.0,
                total_ms: total,
            };
            assert!(mid.lift() > 80.0);
        }
    }

    #[test]
    fn test_ground_pound_lands_before_end() {
        // The slam profile returns to the ground during the recovery tail
        let late = JumpState::GroundPound {
            remaining_ms: 100.0,
            total_ms: 1000.0,
            triggered: true,
        };
        assert_eq!(late.lift(), 0.0);
    }

    #[test]
    fn test_decoy_excluded_from_stats() {
        assert!(!ObstacleKind::Decoy.counts_for_stats());
        assert!(ObstacleKind::Boulder.counts_for_stats());
    }

    #[test]
    fn test_destruction_streak_bookkeeping() {
        let mut stats = PlayerStats::default();
        stats.record_destruction(DestructionCause::Aura);
        stats.record_destruction(DestructionCause::Aura);
        assert_eq!(stats.destruction_streak, 2);
        assert_eq!(stats.destroyed_by_fire, 2);

        stats.record_destruction(DestructionCause::GroundPound);
        assert_eq!(stats.ground_pound_streak, 1);
        // Incineration streak untouched by a pound
        assert_eq!(stats.destruction_streak, 2);

        stats.record_miss();
        assert_eq!(stats.destruction_streak, 0);
        assert_eq!(stats.ground_pound_streak, 0);
        // Monotonic totals survive the miss
        assert_eq!(stats.destroyed_by_fire, 2);
        assert_eq!(stats.best_destruction_streak, 2);
    }

    #[test]
    fn test_movement_destruction_chains_like_fire() {
        let mut stats = PlayerStats::default();
        stats.record_destruction(DestructionCause::GroundPound);
        assert_eq!(stats.ground_pound_streak, 1);

        stats.record_destruction(DestructionCause::Movement);
        assert_eq!(stats.destroyed_by_skill, 1);
        assert_eq!(stats.destruction_streak, 1);
        assert_eq!(stats.best_destruction_streak, 1);
        // A movement clear breaks a pound chain, same as an incineration
        assert_eq!(stats.ground_pound_streak, 0);

        // Shield and blast stay category-only
        stats.record_destruction(DestructionCause::Shield);
        stats.record_destruction(DestructionCause::AreaBlast);
        assert_eq!(stats.destroyed_by_skill, 3);
        assert_eq!(stats.destruction_streak, 1);
    }

    #[test]
    fn test_reset_clears_run_state() {
        let mut state = SimulationState::new(7, 100.0);
        state.hits = 3;
        state.energy.set(10.0);
        state.jump = JumpState::Slide {
            remaining_ms: 100.0,
            total_ms: 300.0,
        };
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, ObstacleKind::Log));
        state.proximity_spawned = vec![true, false];

        state.reset();
        assert_eq!(state.hits, 0);
        assert_eq!(state.energy.current(), state.energy.max());
        assert!(!state.jump.is_active());
        assert!(state.obstacles.is_empty());
        assert_eq!(state.proximity_spawned, vec![false, false]);
    }

    #[test]
    fn test_skill_level_clamped() {
        let mut stats = PlayerStats::default();
        assert_eq!(stats.skill_level(SkillKey::SuperJump), 1);
        stats.set_skill_level(SkillKey::SuperJump, 9);
        assert_eq!(stats.skill_level(SkillKey::SuperJump), MAX_SKILL_LEVEL);
        stats.set_skill_level(SkillKey::SuperJump, 0);
        assert_eq!(stats.skill_level(SkillKey::SuperJump), 1);
    }
}
