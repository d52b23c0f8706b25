//! External API surface
//!
//! The engine owns the simulation state and is driven by an external frame
//! scheduler: one `tick(now_ms)` per animation frame, wall-clock timestamps
//! in, a read-only snapshot and a drained event queue out. Delta clamping
//! and the game-over display hold live here so the simulation itself only
//! ever sees sanitized time steps.

use crate::config::DifficultyConfig;
use crate::consts::*;
use crate::events::GameEvent;
use crate::sim::skills::{self, SkillKey, SkillRegistry};
use crate::sim::state::SimulationState;
use crate::sim::tick::tick;
use crate::sim::track::{ScheduledEvent, Track, TrackDataError};

/// Why a run refused to start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartError {
    Track(TrackDataError),
}

impl std::fmt::Display for StartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StartError::Track(e) => write!(f, "invalid track data: {e}"),
        }
    }
}

impl std::error::Error for StartError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StartError::Track(e) => Some(e),
        }
    }
}

impl From<TrackDataError> for StartError {
    fn from(e: TrackDataError) -> Self {
        StartError::Track(e)
    }
}

/// End-of-run digest for the score screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub victory: bool,
    pub hits: u32,
    pub milestones_banked: u32,
    pub obstacles_destroyed: u32,
    pub boosters_collected: u32,
}

/// The simulation engine an embedding shell drives
pub struct Engine {
    state: SimulationState,
    registry: SkillRegistry,
    config: DifficultyConfig,
    track: Track,
    scheduled: Vec<ScheduledEvent>,
    /// Last wall-clock timestamp seen; `None` until the first tick of a run
    last_time_ms: Option<f64>,
    /// Remaining game-over display window
    hold_ms: f32,
}

impl Engine {
    pub fn new(
        seed: u64,
        config: DifficultyConfig,
        track: Track,
        scheduled: Vec<ScheduledEvent>,
    ) -> Self {
        let mut state = SimulationState::new(seed, config.energy_cap);
        state.proximity_spawned = vec![false; scheduled.len()];
        Self {
            state,
            registry: SkillRegistry::new(),
            config,
            track,
            scheduled,
            last_time_ms: None,
            hold_ms: GAME_OVER_HOLD_MS,
        }
    }

    /// Begin a run. Malformed track data is rejected here, never mid-run.
    pub fn start(&mut self) -> Result<(), StartError> {
        self.track.validate()?;
        self.state.reset();
        self.state.running = true;
        self.last_time_ms = None;
        self.hold_ms = GAME_OVER_HOLD_MS;
        self.state.push_event(GameEvent::RunStarted);
        log::info!(
            "run started: seed={} preset={} segments={}",
            self.state.seed,
            self.config.preset.as_str(),
            self.track.len()
        );
        Ok(())
    }

    /// Stop immediately. With `reset` the run state is cleared; without it
    /// the final state stays inspectable.
    pub fn stop(&mut self, reset: bool) {
        self.state.running = false;
        self.last_time_ms = None;
        if reset {
            self.state.reset();
        }
    }

    /// Cancel all in-flight skills, clear entities, refill energy. The run
    /// stays in whatever running mode it was in; cooldowns survive.
    pub fn reset(&mut self) {
        self.state.reset();
        self.last_time_ms = None;
        self.hold_ms = GAME_OVER_HOLD_MS;
    }

    pub fn set_paused(&mut self, paused: bool) {
        if self.state.running && !self.state.game_over {
            self.state.paused = paused;
        }
    }

    /// Forward a skill press. Returns whether the activation took effect.
    /// Uses the last tick's timestamp, so cooldown checks stay on the same
    /// clock the scheduler feeds in; before the first tick of a run there is
    /// no such timestamp and the press is refused.
    pub fn activate_skill(&mut self, key: SkillKey) -> bool {
        let Some(now_ms) = self.last_time_ms else {
            return false;
        };
        skills::try_activate(&mut self.state, &self.config, &self.registry, key, now_ms)
    }

    /// Advance to `now_ms`. The first call of a run only records the
    /// timestamp; a stalled scheduler is clamped to one bounded step.
    pub fn tick(&mut self, now_ms: f64) {
        if !self.state.running {
            return;
        }
        let Some(last) = self.last_time_ms else {
            self.last_time_ms = Some(now_ms);
            return;
        };
        let dt_ms = ((now_ms - last).max(0.0) as f32).min(MAX_DELTA_MS);
        self.last_time_ms = Some(now_ms);

        if self.state.paused {
            return;
        }

        if self.state.game_over {
            self.hold_ms -= dt_ms;
            if self.hold_ms <= 0.0 {
                let victory = self.state.victory;
                self.state.push_event(GameEvent::RunFinished { victory });
                self.state.running = false;
            }
            return;
        }

        tick(
            &mut self.state,
            &self.config,
            &self.track,
            &self.scheduled,
            &self.registry,
            dt_ms,
        );
        self.registry.draw_all(&self.state);
    }

    /// Read-only view of the full simulation state
    pub fn snapshot(&self) -> &SimulationState {
        &self.state
    }

    pub fn config(&self) -> &DifficultyConfig {
        &self.config
    }

    /// Drain the event queue accumulated since the last drain
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.state.events)
    }

    pub fn run_summary(&self) -> RunSummary {
        let stats = &self.state.stats;
        RunSummary {
            victory: self.state.victory,
            hits: self.state.hits,
            milestones_banked: stats.milestones_banked,
            obstacles_destroyed: stats.destroyed_by_fire
                + stats.destroyed_by_pound
                + stats.destroyed_by_projectile
                + stats.destroyed_by_skill,
            boosters_collected: stats.boosters_collected,
        }
    }

    /// External unlock logic writes ladder ranks through the engine
    pub fn set_skill_level(&mut self, key: SkillKey, level: u8) {
        self.state.stats.set_skill_level(key, level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::track::Segment;

    fn track(durations: &[f32]) -> Track {
        Track::new(
            durations
                .iter()
                .map(|&d| Segment {
                    duration_ms: d,
                    milestone: 50,
                    slope_deg: 0.0,
                    auto_jump: None,
                })
                .collect(),
        )
    }

    fn engine() -> Engine {
        Engine::new(
            7,
            DifficultyConfig::default(),
            track(&[60_000.0, 60_000.0]),
            Vec::new(),
        )
    }

    #[test]
    fn test_start_rejects_short_track() {
        let mut engine = Engine::new(1, DifficultyConfig::default(), track(&[1000.0]), Vec::new());
        assert_eq!(
            engine.start(),
            Err(StartError::Track(TrackDataError::TooFewSegments(1)))
        );
        assert!(!engine.snapshot().running);
    }

    #[test]
    fn test_first_tick_only_records_time() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.tick(5000.0);
        assert_eq!(engine.snapshot().frame, 0);
        assert_eq!(engine.snapshot().elapsed_ms, 0.0);

        engine.tick(5016.0);
        assert_eq!(engine.snapshot().frame, 1);
        assert!((engine.snapshot().elapsed_ms - 16.0).abs() < 1e-6);
    }

    #[test]
    fn test_activation_refused_before_first_tick() {
        let mut engine = engine();
        engine.start().unwrap();
        // No timestamp seen yet: a press must not stamp a cooldown at an
        // arbitrary clock origin
        assert!(!engine.activate_skill(SkillKey::Fireball));
        assert_eq!(engine.snapshot().energy.current(), 100.0);

        // A scheduler whose clock starts mid-session works immediately after
        // its first tick
        engine.tick(5_000_000.0);
        assert!(engine.activate_skill(SkillKey::Fireball));
        assert!(!engine
            .snapshot()
            .cooldowns
            .is_ready(SkillKey::Fireball, 5_000_000.0));
    }

    #[test]
    fn test_stalled_frame_is_clamped() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.tick(0.0);
        engine.tick(10_000.0);
        assert!((engine.snapshot().elapsed_ms - f64::from(MAX_DELTA_MS)).abs() < 1e-6);
    }

    #[test]
    fn test_pause_freezes_simulated_time() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.tick(0.0);
        engine.tick(16.0);
        let elapsed = engine.snapshot().elapsed_ms;

        engine.set_paused(true);
        engine.tick(32.0);
        engine.tick(500.0);
        assert_eq!(engine.snapshot().elapsed_ms, elapsed);

        // Unpausing never replays the pause as one giant step: timestamps
        // kept advancing while paused
        engine.set_paused(false);
        engine.tick(516.0);
        assert!((engine.snapshot().elapsed_ms - (elapsed + 16.0)).abs() < 1e-6);
    }

    #[test]
    fn test_cooldown_keeps_expiring_through_pause() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.tick(0.0);
        engine.tick(16.0);
        assert!(engine.activate_skill(SkillKey::Fireball));
        let cd = engine
            .snapshot()
            .cooldowns
            .remaining_ms(SkillKey::Fireball, 16.0);
        assert!(cd > 0.0);

        engine.set_paused(true);
        let later = 16.0 + cd + 1.0;
        engine.tick(later);
        engine.set_paused(false);
        // Wall clock moved past the deadline during the pause
        assert!(engine.activate_skill(SkillKey::Fireball));
    }

    #[test]
    fn test_game_over_hold_then_run_finished() {
        let mut engine = Engine::new(
            3,
            DifficultyConfig::default(),
            track(&[50.0, 50.0]),
            Vec::new(),
        );
        engine.start().unwrap();
        let mut now = 0.0;
        engine.tick(now);
        while !engine.snapshot().game_over {
            now += 16.0;
            engine.tick(now);
        }
        let events = engine.take_events();
        assert!(!events.contains(&GameEvent::RunFinished { victory: true }));

        // The display window elapses in wall-clock steps
        let steps = (GAME_OVER_HOLD_MS / 16.0) as usize + 2;
        for _ in 0..steps {
            now += 16.0;
            engine.tick(now);
        }
        let events = engine.take_events();
        assert!(events.contains(&GameEvent::RunFinished { victory: true }));
        assert!(!engine.snapshot().running);
    }

    #[test]
    fn test_run_summary_totals() {
        let mut engine = engine();
        engine.start().unwrap();
        engine.tick(0.0);
        let summary = engine.run_summary();
        assert_eq!(summary.hits, 0);
        assert_eq!(summary.obstacles_destroyed, 0);
        assert!(!summary.victory);
    }
}
