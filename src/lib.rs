//! Ridge Runner - a deterministic endless-runner simulation engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tick loop, skills, collision, game state)
//! - `engine`: External API surface (start/stop/reset, activate_skill, tick)
//! - `config`: Data-driven difficulty presets and collision tuning
//! - `events`: Side-channel signals for the render/audio collaborators
//!
//! The engine owns no rendering, audio, input mapping, or persistence. It is
//! driven by an external frame scheduler through [`engine::Engine::tick`] and
//! exposes a read-only snapshot plus a drained event queue per tick.

pub mod config;
pub mod engine;
pub mod events;
pub mod sim;

pub use config::{CollisionTuning, DifficultyConfig, DifficultyPreset};
pub use engine::{Engine, RunSummary, StartError};
pub use events::GameEvent;

/// Engine configuration constants
pub mod consts {
    /// Maximum delta per tick (ms). A stalled frame scheduler (backgrounded
    /// tab, debugger pause) must not be replayed as seconds of travel.
    pub const MAX_DELTA_MS: f32 = 100.0;

    /// Player world position. The runner stays at a fixed x; the world
    /// scrolls toward it.
    pub const PLAYER_X: f32 = 120.0;
    /// Player sprite height (canvas units)
    pub const PLAYER_HEIGHT: f32 = 64.0;
    /// Ground line in canvas coordinates (y grows downward)
    pub const GROUND_Y: f32 = 300.0;

    /// Obstacle spawn edge and trailing despawn boundary
    pub const SPAWN_X: f32 = 960.0;
    pub const DESPAWN_X: f32 = -80.0;

    /// World scroll speed at multiplier 1.0 (units/sec)
    pub const BASE_VELOCITY: f32 = 320.0;

    /// Speed multiplier while the post-hit slowdown is active
    pub const HIT_SLOW_MULT: f32 = 0.4;
    /// Post-hit slowdown duration (simulated ms)
    pub const HIT_SLOW_MS: f32 = 1200.0;

    /// A standard hit halves the current energy (proportional penalty)
    pub const HIT_ENERGY_MULT: f32 = 0.5;

    /// Game-over display window before the run is reported finished
    /// (simulated ms)
    pub const GAME_OVER_HOLD_MS: f32 = 3000.0;

    /// Fade-out time for a destroyed obstacle's terminal animation
    pub const DESTROY_FADE_MS: f32 = 400.0;

    /// Ignited obstacles burn out within this randomized range (ms)
    pub const BURNOUT_MIN_MS: f32 = 500.0;
    pub const BURNOUT_MAX_MS: f32 = 1500.0;

    /// Progress threshold within a segment at which a scheduled proximity
    /// event materializes on-screen
    pub const PROXIMITY_TRIGGER_PROGRESS: f32 = 0.5;
}

/// Convert a per-second rate into this tick's amount
#[inline]
pub fn per_sec(rate: f32, dt_ms: f32) -> f32 {
    rate * dt_ms / 1000.0
}

/// Vertical ground offset at horizontal distance `dx` on a slope of
/// `angle_deg`. Canvas coordinates: uphill ahead means a smaller y.
#[inline]
pub fn slope_rise(angle_deg: f32, dx: f32) -> f32 {
    -dx * angle_deg.to_radians().tan()
}
