// Fixed-timestep clock.
//
// Swimmers are driven at a constant simulation cadence regardless of how fast
// the host loop spins. FixedClock is the simulation time seen by systems;
// FixedStepper turns wall-clock deltas into a number of fixed ticks to run.

use bevy_ecs::prelude::*;

/// 50 Hz, the cadence the fish behaviour was tuned for.
pub const DEFAULT_FIXED_STEP: f32 = 0.02;

/// Upper bound on ticks run for a single wall-clock update. A long stall drops
/// the backlog instead of trying to catch up all at once.
pub const MAX_TICKS_PER_UPDATE: u32 = 10;

/// Simulation time for fixed-step systems.
///
/// `now()` is derived from the tick count, so it does not drift the way a
/// repeatedly summed float would.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct FixedClock {
    step: f32,
    ticks: u64,
}

impl Default for FixedClock {
    fn default() -> Self {
        Self::new(DEFAULT_FIXED_STEP)
    }
}

impl FixedClock {
    pub fn new(step: f32) -> Self {
        Self { step, ticks: 0 }
    }

    pub fn from_rate_hz(hz: f32) -> Self {
        Self::new(1.0 / hz)
    }

    /// Time of the tick currently being simulated.
    pub fn now(&self) -> f32 {
        (self.ticks as f64 * self.step as f64) as f32
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn advance(&mut self) {
        self.ticks += 1;
    }
}

/// Accumulates wall-clock time and hands out whole fixed ticks.
#[derive(Debug, Clone, Copy)]
pub struct FixedStepper {
    step: f32,
    accumulator: f32,
}

impl FixedStepper {
    pub fn new(step: f32) -> Self {
        Self { step, accumulator: 0.0 }
    }

    /// Feed `elapsed` wall-clock seconds; returns how many ticks are due.
    pub fn accumulate(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);
        let mut due = 0;
        while self.accumulator >= self.step {
            self.accumulator -= self.step;
            due += 1;
            if due == MAX_TICKS_PER_UPDATE {
                log::debug!("fixed stepper fell behind, dropping {:.3}s", self.accumulator);
                self.accumulator = 0.0;
                break;
            }
        }
        due
    }
}
