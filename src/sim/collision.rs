//! Collision resolution
//!
//! The tricky part of the engine: one obstacle, one player, and a strict
//! priority chain deciding between pass-through, destructive clear, and a
//! damaging hit. First match wins; every branch returns and stops. The
//! resolver is pure — the tick loop applies the outcome.

use super::state::{Booster, JumpState, SimulationState};
use crate::config::CollisionTuning;
use crate::consts::*;
use crate::events::DestructionCause;
use crate::slope_rise;

/// Outcome of resolving the current obstacle against the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// No interaction this tick
    None,
    /// Obstacle destroyed with no penalty
    Destroyed(DestructionCause),
    /// Damaging hit
    Hit,
}

/// Resolve the player against the current obstacle.
///
/// Only meaningful when an obstacle is live and not already marked hit; the
/// caller guards that. `ground_angle_deg` is the slope of the segment under
/// the player.
pub fn resolve(
    state: &SimulationState,
    tuning: &CollisionTuning,
    ground_angle_deg: f32,
) -> Resolution {
    let Some(obstacle) = state.current_obstacle() else {
        return Resolution::None;
    };
    if obstacle.has_been_hit {
        return Resolution::None;
    }

    // Horizontal gating: nothing below is reachable outside the band
    let dx = obstacle.x - PLAYER_X;
    if dx.abs() > tuning.range_x {
        return Resolution::None;
    }

    // 1. Rolling fire: deliberate in-flight aim, narrower window, checked
    //    even before invincibility
    if matches!(state.jump, JumpState::RollingFire { .. })
        && dx.abs() <= tuning.rolling_fire_range_x
    {
        return Resolution::Destroyed(DestructionCause::RollingFire);
    }

    // 2. General invincibility: obstacle passes through untouched
    if state.effects.invincible_ms > 0.0 {
        return Resolution::None;
    }

    // 3. Persistent fire aura
    if state.effects.aura_ms > 0.0 {
        return Resolution::Destroyed(DestructionCause::Aura);
    }

    // 4. One-shot shield (consumed by the caller on this use)
    if state.effects.shield {
        return Resolution::Destroyed(DestructionCause::Shield);
    }

    // 5. Destructive movement ability. The ground slam only clears once its
    //    progress has passed the descending half — the impact moment;
    //    before that it falls through to geometry.
    match state.jump {
        JumpState::GroundPound { .. } => {
            if state.jump.progress() >= 0.5 {
                return Resolution::Destroyed(DestructionCause::GroundPound);
            }
        }
        ref jump if jump.is_destructive() => {
            return Resolution::Destroyed(DestructionCause::Movement);
        }
        _ => {}
    }

    // 6. Standard geometry. Canvas coordinates: y grows downward, so the
    //    player is clear when strictly above the minimum-clearance line.
    let obstacle_top = obstacle.top_y() + slope_rise(ground_angle_deg, dx);
    let min_clearance = obstacle_top - PLAYER_HEIGHT + tuning.clearance_margin;
    let clear = state.airborne() && state.player_y() < min_clearance;
    if clear {
        Resolution::None
    } else {
        Resolution::Hit
    }
}

/// Booster / proximity-event collection check.
///
/// A simpler single-branch geometry test than obstacles: the player's lowest
/// extent must have reached the item's top edge, inside a slightly wider
/// horizontal band. Idempotence comes from the `collected` flag the caller
/// flips immediately.
pub fn booster_reachable(state: &SimulationState, booster: &Booster, tuning: &CollisionTuning) -> bool {
    if booster.collected {
        return false;
    }
    let dx = booster.x - PLAYER_X;
    if dx.abs() > tuning.booster_range_x {
        return false;
    }
    state.player_y() + PLAYER_HEIGHT >= booster.top_y()
}
