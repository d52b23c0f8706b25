//! The energy economy
//!
//! A single bounded resource. Every write funnels through [`EnergyPool::set`]
//! so the `0 <= current <= max` invariant holds after any mutation, whatever
//! the caller was doing.

use serde::{Deserialize, Serialize};

/// Bounded energy resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyPool {
    current: f32,
    max: f32,
}

impl EnergyPool {
    /// A pool starting at its cap
    pub fn full(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    /// The single clamp-on-write mutator
    pub fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
    }

    pub fn drain(&mut self, amount: f32) {
        self.set(self.current - amount.max(0.0));
    }

    pub fn gain(&mut self, amount: f32) {
        self.set(self.current + amount.max(0.0));
    }

    /// Gain expressed as a fraction of the cap (booster pickups)
    pub fn gain_frac_of_cap(&mut self, frac: f32) {
        self.gain(self.max * frac);
    }

    pub fn refill(&mut self) {
        self.current = self.max;
    }

    pub fn is_empty(&self) -> bool {
        self.current <= 0.0
    }

    /// Can the pool cover a flat activation cost?
    pub fn can_afford(&self, cost: f32) -> bool {
        self.current >= cost
    }

    /// Continuous drain toward a deadline.
    ///
    /// Drains `current * dt / remaining_ms` so the pool reaches exactly zero
    /// in the same tick the deadline does, at any frame rate. When the tick
    /// covers the whole remaining window the pool empties outright.
    pub fn drain_to_deadline(&mut self, dt_ms: f32, remaining_ms: f32) {
        if remaining_ms <= dt_ms {
            self.set(0.0);
        } else {
            let drain = self.current * (dt_ms / remaining_ms);
            self.set(self.current - drain);
        }
    }
}
