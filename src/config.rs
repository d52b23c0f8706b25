//! Difficulty configuration
//!
//! A named preset bundle selected by the UI shell and handed to the engine at
//! construction. Everything a playtester tunes lives here: spawn odds, the
//! energy economy, and the collision tolerances the resolver consults.

use serde::{Deserialize, Serialize};

/// Named difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DifficultyPreset {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl DifficultyPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyPreset::Easy => "Easy",
            DifficultyPreset::Normal => "Normal",
            DifficultyPreset::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(DifficultyPreset::Easy),
            "normal" | "med" | "medium" => Some(DifficultyPreset::Normal),
            "hard" => Some(DifficultyPreset::Hard),
            _ => None,
        }
    }
}

/// Collision tolerances.
///
/// These are playtest-tuned values, not derived from a physical model. Their
/// relative magnitudes matter more than the absolutes: the rolling-fire
/// window is deliberately narrower than the standard band (aimed play), and
/// the booster band slightly wider (forgiving collection).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollisionTuning {
    /// Horizontal band around the player inside which obstacle resolution
    /// runs at all
    pub range_x: f32,
    /// Narrower band used by the rolling-fire in-flight destroy check
    pub rolling_fire_range_x: f32,
    /// Wider band used for booster / proximity-event collection
    pub booster_range_x: f32,
    /// Margin added when computing the airborne minimum-clearance threshold
    pub clearance_margin: f32,
}

impl Default for CollisionTuning {
    fn default() -> Self {
        Self {
            range_x: 48.0,
            rolling_fire_range_x: 20.0,
            booster_range_x: 62.0,
            clearance_margin: 6.0,
        }
    }
}

/// Full difficulty bundle consumed by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifficultyConfig {
    pub preset: DifficultyPreset,

    // === Spawning ===
    /// Spawn rolls happen every Nth frame
    pub spawn_cadence_frames: u64,
    /// Chance (0-100) an obstacle spawns on a roll when none is active
    pub obstacle_frequency_pct: u32,
    /// Chance (0-100) a booster spawns on an independent roll
    pub booster_frequency_pct: u32,
    /// Chance (0-100) a spawned obstacle is a cosmetic decoy instead
    pub decoy_pct: u32,

    // === Energy economy ===
    /// Energy cap
    pub energy_cap: f32,
    /// Baseline passive drain (energy/sec) when no sustained drain is active
    pub passive_drain_per_sec: f32,
    /// Booster collection refund as a fraction of the cap
    pub booster_gain_frac: f32,

    // === Speed effects ===
    /// Accelerator multiplier and duration (simulated ms)
    pub accel_mult: f32,
    pub accel_ms: f32,
    /// Decelerator multiplier and duration (simulated ms)
    pub decel_mult: f32,
    pub decel_ms: f32,

    // === Collision ===
    pub collision: CollisionTuning,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self::from_preset(DifficultyPreset::Normal)
    }
}

impl DifficultyConfig {
    /// Build the config bundle for a named preset
    pub fn from_preset(preset: DifficultyPreset) -> Self {
        let base = Self {
            preset,
            spawn_cadence_frames: 6,
            obstacle_frequency_pct: 55,
            booster_frequency_pct: 12,
            decoy_pct: 5,
            energy_cap: 100.0,
            passive_drain_per_sec: 1.2,
            booster_gain_frac: 0.15,
            accel_mult: 1.5,
            accel_ms: 4000.0,
            decel_mult: 0.7,
            decel_ms: 4000.0,
            collision: CollisionTuning::default(),
        };

        match preset {
            DifficultyPreset::Easy => Self {
                obstacle_frequency_pct: 40,
                booster_frequency_pct: 18,
                passive_drain_per_sec: 0.8,
                collision: CollisionTuning {
                    range_x: 40.0,
                    clearance_margin: 10.0,
                    ..CollisionTuning::default()
                },
                ..base
            },
            DifficultyPreset::Normal => base,
            DifficultyPreset::Hard => Self {
                obstacle_frequency_pct: 72,
                booster_frequency_pct: 8,
                decoy_pct: 10,
                passive_drain_per_sec: 1.8,
                collision: CollisionTuning {
                    range_x: 56.0,
                    clearance_margin: 3.0,
                    ..CollisionTuning::default()
                },
                ..base
            },
        }
    }

    /// Load a config handed in by a collaborator as JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
