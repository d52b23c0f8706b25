//! Track data and the progression tracker
//!
//! A track is an ordered list of segments, each with its own duration,
//! milestone reward, and slope. The data itself comes from an external
//! loader; the engine only validates and consumes it.

use serde::{Deserialize, Serialize};

use super::state::{Booster, BoosterKind, SimulationState};
use crate::consts::PROXIMITY_TRIGGER_PROGRESS;
use crate::events::GameEvent;

/// A deterministic progress sub-range used for scripted jump assistance
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AutoJumpWindow {
    pub start: f32,
    pub end: f32,
}

/// One stretch of track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Time to traverse at speed multiplier 1.0 (ms)
    pub duration_ms: f32,
    /// Reward banked on completion
    pub milestone: u32,
    /// Ground slope, degrees (positive = uphill ahead)
    pub slope_deg: f32,
    /// Optional scripted-jump window
    #[serde(default)]
    pub auto_jump: Option<AutoJumpWindow>,
}

/// A scheduled accelerator/decelerator tied to an in-simulation "day"
/// (segment index), fed in by the data-loading collaborator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub day: u32,
    pub kind: BoosterKind,
}

/// Reasons a track is rejected at `start()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackDataError {
    /// A run needs at least two segments
    TooFewSegments(usize),
    NonPositiveDuration(usize),
}

impl std::fmt::Display for TrackDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackDataError::TooFewSegments(n) => {
                write!(f, "track needs at least 2 segments, got {n}")
            }
            TrackDataError::NonPositiveDuration(i) => {
                write!(f, "segment {i} has a non-positive duration")
            }
        }
    }
}

impl std::error::Error for TrackDataError {}

/// The full ordered segment list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// Load track data handed in as JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The engine never starts in an undefined state; malformed track data
    /// is rejected up front.
    pub fn validate(&self) -> Result<(), TrackDataError> {
        if self.segments.len() < 2 {
            return Err(TrackDataError::TooFewSegments(self.segments.len()));
        }
        for (i, seg) in self.segments.iter().enumerate() {
            if seg.duration_ms <= 0.0 {
                return Err(TrackDataError::NonPositiveDuration(i));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Slope under the player right now (0 past the end)
    pub fn slope_at(&self, index: usize) -> f32 {
        self.segment(index).map(|s| s.slope_deg).unwrap_or(0.0)
    }
}

/// Accumulate segment progress for this tick.
///
/// `progress += dt / (duration / speed)`: a faster world shortens the
/// effective segment duration. Returns true when the boundary was crossed;
/// the actual bookkeeping runs at the end of the tick.
pub fn accumulate_progress(state: &mut SimulationState, track: &Track, dt_ms: f32) -> bool {
    let Some(segment) = track.segment(state.segment_index) else {
        return false;
    };
    let effective_ms = segment.duration_ms / state.speed_multiplier.max(0.01);
    state.segment_progress += dt_ms / effective_ms;
    state.segment_progress >= 1.0
}

/// Whether the current progress sits inside the segment's auto-jump window
pub fn in_auto_jump_window(state: &SimulationState, track: &Track) -> bool {
    track
        .segment(state.segment_index)
        .and_then(|s| s.auto_jump)
        .map(|w| state.segment_progress >= w.start && state.segment_progress <= w.end)
        .unwrap_or(false)
}

/// End-of-segment bookkeeping: one milestone award, one index increment,
/// transient per-segment state cleared. Returns true when this was the final
/// segment and the run is over.
pub fn complete_segment(state: &mut SimulationState, track: &Track) -> bool {
    let index = state.segment_index;
    let milestone = track.segment(index).map(|s| s.milestone).unwrap_or(0);
    state.stats.milestones_banked += milestone;
    state.push_event(GameEvent::SegmentComplete { index, milestone });
    log::info!("segment {index} complete, milestone {milestone}");

    state.segment_index += 1;
    state.segment_progress = 0.0;
    state.auto_jump_armed = true;

    // Current obstacle/booster/event do not carry across the boundary
    state.obstacles.clear();
    state.boosters.clear();
    state.speed_multiplier = 1.0;
    state.effects.accel_ms = 0.0;
    state.effects.decel_ms = 0.0;
    state.effects.hit_slow_ms = 0.0;

    state.segment_index >= track.len()
}

/// Materialize scheduled proximity events whose trigger point the player has
/// reached. Each event spawns at most once per run.
pub fn spawn_due_proximity_events(state: &mut SimulationState, scheduled: &[ScheduledEvent]) {
    for (i, event) in scheduled.iter().enumerate() {
        if state.proximity_spawned.get(i).copied().unwrap_or(true) {
            continue;
        }
        let due = event.day as usize == state.segment_index
            && state.segment_progress >= PROXIMITY_TRIGGER_PROGRESS;
        if due {
            state.proximity_spawned[i] = true;
            let id = state.next_entity_id();
            let mut booster = Booster::new(id, event.kind);
            booster.from_event = true;
            state.boosters.push(booster);
            state.push_event(GameEvent::BoosterSpawned { kind: event.kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_segment_track() -> Track {
        Track::new(vec![
            Segment {
                duration_ms: 10_000.0,
                milestone: 100,
                slope_deg: 0.0,
                auto_jump: Some(AutoJumpWindow { start: 0.4, end: 0.5 }),
            },
            Segment {
                duration_ms: 8_000.0,
                milestone: 150,
                slope_deg: 4.0,
                auto_jump: None,
            },
        ])
    }

    #[test]
    fn test_validate_rejects_short_tracks() {
        assert_eq!(
            Track::new(vec![]).validate(),
            Err(TrackDataError::TooFewSegments(0))
        );
        let one = Track::new(vec![Segment {
            duration_ms: 1000.0,
            milestone: 1,
            slope_deg: 0.0,
            auto_jump: None,
        }]);
        assert_eq!(one.validate(), Err(TrackDataError::TooFewSegments(1)));
        assert!(two_segment_track().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_duration() {
        let mut track = two_segment_track();
        track.segments[1].duration_ms = 0.0;
        assert_eq!(track.validate(), Err(TrackDataError::NonPositiveDuration(1)));
    }

    #[test]
    fn test_progress_scales_with_speed() {
        let track = two_segment_track();
        let mut state = SimulationState::new(1, 100.0);
        accumulate_progress(&mut state, &track, 1000.0);
        assert!((state.segment_progress - 0.1).abs() < 1e-6);

        state.segment_progress = 0.0;
        state.speed_multiplier = 2.0;
        accumulate_progress(&mut state, &track, 1000.0);
        assert!((state.segment_progress - 0.2).abs() < 1e-6);
    }

    #[test]
    fn test_boundary_awards_milestone_exactly_once() {
        let track = two_segment_track();
        let mut state = SimulationState::new(1, 100.0);
        state.segment_progress = 1.0;
        let finished = complete_segment(&mut state, &track);
        assert!(!finished);
        assert_eq!(state.segment_index, 1);
        assert_eq!(state.stats.milestones_banked, 100);
        assert_eq!(state.segment_progress, 0.0);

        // Completing the final segment ends the run
        state.segment_progress = 1.0;
        let finished = complete_segment(&mut state, &track);
        assert!(finished);
        assert_eq!(state.stats.milestones_banked, 250);
    }

    #[test]
    fn test_auto_jump_window() {
        let track = two_segment_track();
        let mut state = SimulationState::new(1, 100.0);
        state.segment_progress = 0.2;
        assert!(!in_auto_jump_window(&state, &track));
        state.segment_progress = 0.45;
        assert!(in_auto_jump_window(&state, &track));
        state.segment_index = 1;
        assert!(!in_auto_jump_window(&state, &track));
    }

    #[test]
    fn test_proximity_event_spawns_once() {
        let scheduled = [ScheduledEvent {
            day: 0,
            kind: BoosterKind::Decelerator,
        }];
        let mut state = SimulationState::new(1, 100.0);
        state.proximity_spawned = vec![false];

        state.segment_progress = 0.2;
        spawn_due_proximity_events(&mut state, &scheduled);
        assert!(state.boosters.is_empty());

        state.segment_progress = 0.6;
        spawn_due_proximity_events(&mut state, &scheduled);
        assert_eq!(state.boosters.len(), 1);
        assert!(state.boosters[0].from_event);

        // Already spawned: nothing new
        spawn_due_proximity_events(&mut state, &scheduled);
        assert_eq!(state.boosters.len(), 1);
    }
}
