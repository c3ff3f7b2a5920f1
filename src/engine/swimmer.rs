// Wandering swimmer: pick a point in the band, face it, swim there, repeat.
//
// Two states. Deciding picks a speed and destination on the next tick.
// Traveling moves along the facing direction until either the planned arrival
// time passes or the next step would overshoot, in which case the swimmer is
// snapped onto the target and goes back to Deciding. Speed and target only
// change when a decision is made.

use bevy_ecs::prelude::*;
use glam::Vec3;
use rand::{Rng, RngCore};
use serde::Deserialize;
use std::cmp::Ordering;

use super::area::{AreaSampler, FISH_REGION};
use super::components::Transform;
use super::error::SwimError;

/// Slack allowed when checking a sampled point against its region.
const REGION_TOLERANCE: f32 = 1e-3;

// ============================================================================
// SPEED JITTER
// ============================================================================

/// Closed range the base speed is multiplied by at every decision.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct SpeedJitter {
    pub min: f32,
    pub max: f32,
}

impl Default for SpeedJitter {
    fn default() -> Self {
        Self { min: 0.5, max: 1.5 }
    }
}

impl SpeedJitter {
    pub fn validate(&self) -> Result<(), SwimError> {
        if self.min.is_finite() && self.max.is_finite() && self.min > 0.0 && self.min <= self.max {
            Ok(())
        } else {
            Err(SwimError::InvalidJitter { min: self.min, max: self.max })
        }
    }

    fn sample(&self, rng: &mut dyn RngCore) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..=self.max)
        } else {
            self.min
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SwimState {
    /// A new speed and destination are chosen on the next tick.
    #[default]
    Deciding,
    /// Heading for the current target; re-decide once `now >= arrive_at`.
    Traveling { arrive_at: f32 },
}

/// What a single tick did. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing changed: base speed is zero, or the drawn speed was unusable.
    Idle,
    /// Picked a new destination and speed.
    Decided,
    /// Stepped toward the destination.
    Moved,
    /// Would have overshot, so landed exactly on the destination.
    Arrived,
}

/// Per-entity wandering behaviour.
#[derive(Component, Debug, Clone, Default)]
pub struct Swimmer {
    base_speed: f32,
    jitter: SpeedJitter,
    current_speed: f32,
    target: Option<Vec3>,
    state: SwimState,
}

impl Swimmer {
    pub fn new(base_speed: f32) -> Result<Self, SwimError> {
        let mut swimmer = Self::default();
        swimmer.configure(base_speed)?;
        Ok(swimmer)
    }

    pub fn with_jitter(mut self, jitter: SpeedJitter) -> Result<Self, SwimError> {
        jitter.validate()?;
        self.jitter = jitter;
        Ok(self)
    }

    /// Set the cruising speed. Negative and non-finite speeds are rejected and
    /// the previous value is kept; zero parks the swimmer.
    pub fn configure(&mut self, base_speed: f32) -> Result<(), SwimError> {
        if !base_speed.is_finite() || base_speed < 0.0 {
            log::warn!("rejecting swimmer base speed {base_speed}");
            return Err(SwimError::InvalidSpeed(base_speed));
        }
        self.base_speed = base_speed;
        Ok(())
    }

    pub fn base_speed(&self) -> f32 {
        self.base_speed
    }

    pub fn state(&self) -> SwimState {
        self.state
    }

    /// Speed picked at the last decision, or zero before the first one.
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Destination picked at the last decision. Kept after arrival.
    pub fn target(&self) -> Option<Vec3> {
        self.target
    }

    /// Simulation time at which the next decision is due. `None` means the very
    /// next tick decides.
    pub fn next_decision_time(&self) -> Option<f32> {
        match self.state {
            SwimState::Traveling { arrive_at } => Some(arrive_at),
            SwimState::Deciding => None,
        }
    }

    /// Advance by one fixed tick at simulation time `now`.
    pub fn tick(
        &mut self,
        transform: &mut Transform,
        anchor: Vec3,
        now: f32,
        fixed_dt: f32,
        rng: &mut dyn RngCore,
        area: &dyn AreaSampler,
    ) -> TickOutcome {
        if self.base_speed <= 0.0 {
            return TickOutcome::Idle;
        }

        match (self.state, self.target) {
            (SwimState::Traveling { arrive_at }, Some(target)) if now < arrive_at => {
                let step = transform.forward() * self.current_speed * fixed_dt;
                if step.length() <= transform.position.distance(target) {
                    transform.position += step;
                    TickOutcome::Moved
                } else {
                    transform.position = target;
                    self.state = SwimState::Deciding;
                    TickOutcome::Arrived
                }
            }
            _ => self.decide(transform, anchor, now, rng, area),
        }
    }

    fn decide(
        &mut self,
        transform: &mut Transform,
        anchor: Vec3,
        now: f32,
        rng: &mut dyn RngCore,
        area: &dyn AreaSampler,
    ) -> TickOutcome {
        let speed = self.base_speed * self.jitter.sample(rng);
        // Also catches NaN.
        if speed.partial_cmp(&0.0) != Some(Ordering::Greater) {
            log::warn!("swimmer drew non-positive speed {speed}, staying put");
            self.state = SwimState::Deciding;
            return TickOutcome::Idle;
        }

        let target = area.sample_position(rng, anchor, &FISH_REGION);
        if !FISH_REGION.contains(anchor, target, REGION_TOLERANCE) {
            log::debug!("area sampler returned {target} outside the swim region around {anchor}");
        }

        transform.look_at(target, Vec3::Y);
        let arrive_at = now + transform.position.distance(target) / speed;
        log::trace!("swimmer heading for {target} at {speed:.2}, due at t={arrive_at:.2}");

        self.current_speed = speed;
        self.target = Some(target);
        self.state = SwimState::Traveling { arrive_at };
        TickOutcome::Decided
    }
}
