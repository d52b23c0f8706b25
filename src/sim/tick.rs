//! The per-tick update pipeline
//!
//! One call advances the whole simulation by `dt_ms` of simulated time, in a
//! fixed step order: energy, progression, entity movement, spawning,
//! collision, skill countdowns, speed resolution, segment bookkeeping.
//! The order is part of the engine's contract; reordering steps changes
//! observable behavior at segment boundaries and on the hit tick.

use super::collision::{self, Resolution};
use super::skills::SkillRegistry;
use super::state::{
    Booster, BoosterKind, Obstacle, ObstacleKind, ObstaclePhase, ProjectileKind, SimulationState,
};
use super::track::{self, ScheduledEvent, Track};
use crate::config::DifficultyConfig;
use crate::consts::*;
use crate::events::{DestructionCause, GameEvent};
use crate::per_sec;

use rand::Rng;

/// Scripted-assistance jump duration (ms)
const AUTO_JUMP_MS: f32 = 500.0;
/// Obstacle half-width for projectile overlap tests (canvas units)
const OBSTACLE_HALF_WIDTH: f32 = 24.0;
/// Downward pull on lobbed projectiles (canvas units/sec^2)
const BOTTLE_GRAVITY: f32 = 900.0;

/// Advance the simulation by one tick.
///
/// `dt_ms` is already clamped by the caller. No-op outside active play; the
/// game-over hold runs in the engine, not here.
pub fn tick(
    state: &mut SimulationState,
    cfg: &DifficultyConfig,
    track: &Track,
    scheduled: &[ScheduledEvent],
    registry: &SkillRegistry,
    dt_ms: f32,
) {
    if !state.running || state.paused || state.game_over {
        return;
    }

    step_energy(state, cfg, dt_ms);

    let crossed = track::accumulate_progress(state, track, dt_ms);
    step_auto_jump(state, track);
    track::spawn_due_proximity_events(state, scheduled);

    step_entities(state, dt_ms);
    step_spawning(state, cfg);
    step_collision(state, cfg, track);

    registry.update_all(state, cfg, dt_ms);

    step_speed(state, cfg, dt_ms);

    if crossed && track::complete_segment(state, track) {
        state.game_over = true;
        state.victory = state.hits == 0;
        log::info!(
            "run over: victory={} hits={} milestones={}",
            state.victory,
            state.hits,
            state.stats.milestones_banked
        );
    }

    state.frame += 1;
    state.elapsed_ms += f64::from(dt_ms);
}

/// Energy decay. The sustained aura drains the pool toward its own deadline
/// so both expire on the same tick; otherwise a small passive drain applies.
fn step_energy(state: &mut SimulationState, cfg: &DifficultyConfig, dt_ms: f32) {
    if state.effects.aura_ms > 0.0 {
        state.energy.drain_to_deadline(dt_ms, state.effects.aura_ms);
        state.effects.aura_ms = (state.effects.aura_ms - dt_ms).max(0.0);
    } else {
        state.energy.drain(per_sec(cfg.passive_drain_per_sec, dt_ms));
    }
}

/// Fire the scripted assistance jump once per armed window
fn step_auto_jump(state: &mut SimulationState, track: &Track) {
    if state.auto_jump_armed
        && !state.jump.is_active()
        && track::in_auto_jump_window(state, track)
    {
        state.auto_jump_armed = false;
        state.jump = crate::sim::state::JumpState::Hurdle {
            remaining_ms: AUTO_JUMP_MS,
            total_ms: AUTO_JUMP_MS,
        };
    }
}

/// Advance and retire world entities: obstacles (scroll, burnout, miss,
/// fade-out), boosters (scroll), projectiles (flight, obstacle impact).
fn step_entities(state: &mut SimulationState, dt_ms: f32) {
    let scroll = per_sec(BASE_VELOCITY, dt_ms) * state.speed_multiplier;

    let mut burnouts = Vec::new();
    for obstacle in &mut state.obstacles {
        obstacle.x -= scroll * obstacle.speed_mult;
        match &mut obstacle.phase {
            ObstaclePhase::Burning { remaining_ms } => {
                *remaining_ms -= dt_ms;
                if *remaining_ms <= 0.0 {
                    burnouts.push(obstacle.id);
                }
            }
            ObstaclePhase::Destroyed { fade_ms } => *fade_ms -= dt_ms,
            ObstaclePhase::Active => {}
        }
    }
    for id in burnouts {
        destroy_obstacle(state, id, DestructionCause::Burnout);
    }

    // An obstacle leaving the trailing edge unresolved is a miss
    let missed = state
        .obstacles
        .iter()
        .filter(|o| o.x < DESPAWN_X && o.is_live() && !o.has_been_hit)
        .count();
    state.obstacles.retain(|o| {
        o.x >= DESPAWN_X && !matches!(o.phase, ObstaclePhase::Destroyed { fade_ms } if fade_ms <= 0.0)
    });
    for _ in 0..missed {
        state.stats.record_miss();
        state.push_event(GameEvent::ObstacleMissed);
    }

    for booster in &mut state.boosters {
        booster.x -= scroll;
    }
    state.boosters.retain(|b| b.x >= DESPAWN_X && !b.collected);

    let dt_s = dt_ms / 1000.0;
    for projectile in &mut state.projectiles {
        if projectile.kind == ProjectileKind::Bottle {
            projectile.vel.y += BOTTLE_GRAVITY * dt_s;
        }
        projectile.pos += projectile.vel * dt_s;
        projectile.ttl_ms -= dt_ms;
    }

    let mut spent = Vec::new();
    let mut impacts = Vec::new();
    for projectile in &state.projectiles {
        for obstacle in &state.obstacles {
            let overlap = (projectile.pos.x - obstacle.x).abs() <= OBSTACLE_HALF_WIDTH
                && projectile.pos.y >= obstacle.top_y();
            if obstacle.is_live() && overlap {
                spent.push(projectile.id);
                impacts.push(obstacle.id);
                break;
            }
        }
    }
    for id in impacts {
        destroy_obstacle(state, id, DestructionCause::Projectile);
    }
    state.projectiles.retain(|p| {
        !spent.contains(&p.id)
            && p.ttl_ms > 0.0
            && p.pos.x <= SPAWN_X + OBSTACLE_HALF_WIDTH
            && p.pos.y < GROUND_Y
    });
}

/// Frequency-rolled spawning, one roll every Nth frame. At most one live
/// obstacle and one uncollected booster are on screen at a time.
fn step_spawning(state: &mut SimulationState, cfg: &DifficultyConfig) {
    if state.frame % cfg.spawn_cadence_frames != 0 {
        return;
    }

    if state.current_obstacle().is_none()
        && state.rng.random_range(0..100) < cfg.obstacle_frequency_pct
    {
        let kind = if state.rng.random_range(0..100) < cfg.decoy_pct {
            ObstacleKind::Decoy
        } else {
            match state.rng.random_range(0..4u32) {
                0 => ObstacleKind::Boulder,
                1 => ObstacleKind::Log,
                2 => ObstacleKind::Spikes,
                _ => ObstacleKind::Crate,
            }
        };
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, kind));
        state.push_event(GameEvent::ObstacleSpawned { kind });
    }

    if !state.boosters.iter().any(|b| !b.collected)
        && state.rng.random_range(0..100) < cfg.booster_frequency_pct
    {
        let kind = if state.rng.random_range(0..2u32) == 0 {
            BoosterKind::Accelerator
        } else {
            BoosterKind::Decelerator
        };
        let id = state.next_entity_id();
        state.boosters.push(Booster::new(id, kind));
        state.push_event(GameEvent::BoosterSpawned { kind });
    }
}

/// Resolve the current obstacle and apply the outcome, then check booster
/// collection.
fn step_collision(state: &mut SimulationState, cfg: &DifficultyConfig, track: &Track) {
    let slope = track.slope_at(state.segment_index);
    match collision::resolve(state, &cfg.collision, slope) {
        Resolution::None => {}
        Resolution::Destroyed(cause) => {
            if cause == DestructionCause::Shield {
                state.effects.shield = false;
                state.push_event(GameEvent::ShieldConsumed);
            }
            if let Some(id) = state.current_obstacle().map(|o| o.id) {
                destroy_obstacle(state, id, cause);
            }
        }
        Resolution::Hit => {
            if let Some(obstacle) = state.current_obstacle_mut() {
                obstacle.has_been_hit = true;
            }
            state.hits += 1;
            let halved = state.energy.current() * HIT_ENERGY_MULT;
            state.energy.set(halved);
            state.effects.hit_slow_ms = HIT_SLOW_MS;
            state.stats.record_hit();
            state.push_event(GameEvent::PlayerHit);
            log::debug!("hit #{} at frame {}", state.hits, state.frame);
        }
    }

    let reachable = state
        .boosters
        .iter()
        .find(|b| collision::booster_reachable(state, b, &cfg.collision))
        .map(|b| b.id);
    if let Some(id) = reachable {
        collect_booster(state, cfg, id);
    }
}

/// Decrement effect timers and resolve the single speed multiplier for the
/// next tick. Priority: hit penalty over decelerator over accelerator.
fn step_speed(state: &mut SimulationState, cfg: &DifficultyConfig, dt_ms: f32) {
    let fx = &mut state.effects;
    fx.invincible_ms = (fx.invincible_ms - dt_ms).max(0.0);
    fx.hit_slow_ms = (fx.hit_slow_ms - dt_ms).max(0.0);
    fx.accel_ms = (fx.accel_ms - dt_ms).max(0.0);
    fx.decel_ms = (fx.decel_ms - dt_ms).max(0.0);

    state.speed_multiplier = if fx.hit_slow_ms > 0.0 {
        HIT_SLOW_MULT
    } else if fx.decel_ms > 0.0 {
        cfg.decel_mult
    } else if fx.accel_ms > 0.0 {
        cfg.accel_mult
    } else {
        1.0
    };
}

/// Move an obstacle into its terminal fade and do the stats/event
/// bookkeeping. Decoys fade like everything else but never count.
pub(crate) fn destroy_obstacle(state: &mut SimulationState, id: u32, cause: DestructionCause) {
    let Some(obstacle) = state.obstacles.iter_mut().find(|o| o.id == id) else {
        return;
    };
    if !obstacle.is_live() {
        return;
    }
    obstacle.phase = ObstaclePhase::Destroyed {
        fade_ms: DESTROY_FADE_MS,
    };
    let kind = obstacle.kind;
    if kind.counts_for_stats() {
        state.stats.record_destruction(cause);
    }
    state.push_event(GameEvent::ObstacleDestroyed { kind, cause });
}

/// Collect a booster: energy refund plus the matching timed speed field
pub(crate) fn collect_booster(state: &mut SimulationState, cfg: &DifficultyConfig, id: u32) {
    let Some(booster) = state.boosters.iter_mut().find(|b| b.id == id) else {
        return;
    };
    if booster.collected {
        return;
    }
    booster.collected = true;
    let kind = booster.kind;
    state.energy.gain_frac_of_cap(cfg.booster_gain_frac);
    match kind {
        BoosterKind::Accelerator => state.effects.accel_ms = cfg.accel_ms,
        BoosterKind::Decelerator => state.effects.decel_ms = cfg.decel_ms,
    }
    state.stats.boosters_collected += 1;
    state.push_event(GameEvent::BoosterCollected { kind });
}
