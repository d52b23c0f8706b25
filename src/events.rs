//! Side-channel events for external collaborators
//!
//! The audio and render layers are not polled; the engine pushes one discrete
//! event per state transition and the caller drains the queue after each tick.
//! Events are signals, not state: dropping the queue loses sounds/flashes but
//! never corrupts the simulation.

use serde::{Deserialize, Serialize};

use crate::sim::skills::SkillKey;
use crate::sim::state::{BoosterKind, ObstacleKind};

/// What destroyed an obstacle. Drives both audio selection and the stats
/// category the destruction counts toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DestructionCause {
    /// Rolling-fire in-flight window
    RollingFire,
    /// Persistent fire aura
    Aura,
    /// One-shot consumable shield
    Shield,
    /// A destructive movement ability
    Movement,
    /// Ground-slam impact
    GroundPound,
    /// Player-launched projectile
    Projectile,
    /// Level-tiered area attack
    AreaBlast,
    /// Ignited obstacle reached its burnout deadline
    Burnout,
}

/// Discrete engine-to-collaborator signal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    RunStarted,
    SkillActivated { key: SkillKey },
    ObstacleSpawned { kind: ObstacleKind },
    ObstacleDestroyed { kind: ObstacleKind, cause: DestructionCause },
    /// Obstacle crossed the trailing boundary unresolved
    ObstacleMissed,
    PlayerHit,
    ShieldConsumed,
    BoosterSpawned { kind: BoosterKind },
    BoosterCollected { kind: BoosterKind },
    SegmentComplete { index: usize, milestone: u32 },
    /// Fired once the game-over display window has elapsed
    RunFinished { victory: bool },
}
