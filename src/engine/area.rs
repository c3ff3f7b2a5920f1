// Area sampling: where a swimmer may head next.
//
// The swimmer never decides on geometry itself. It hands an anchor point and a
// region shape to an AreaSampler and swims toward whatever comes back.

use glam::Vec3;
use rand::{Rng, RngCore};
use std::f32::consts::TAU;

// ============================================================================
// REGION
// ============================================================================

/// Annular band around an anchor, bounded in height.
///
/// Horizontal distance from the anchor lies in `[inner_radius, outer_radius]`,
/// height above the anchor in `[min_height, max_height]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwimRegion {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub min_height: f32,
    pub max_height: f32,
}

/// The band fish wander in. Fixed for the behaviour, not a tuning knob.
pub const FISH_REGION: SwimRegion = SwimRegion {
    inner_radius: 100.0,
    outer_radius: 260.0,
    min_height: 2.0,
    max_height: 13.0,
};

impl Default for SwimRegion {
    fn default() -> Self {
        FISH_REGION
    }
}

impl SwimRegion {
    /// True if `point` lies inside the band around `anchor` (with `tolerance`).
    pub fn contains(&self, anchor: Vec3, point: Vec3, tolerance: f32) -> bool {
        let offset = point - anchor;
        let horizontal = (offset.x * offset.x + offset.z * offset.z).sqrt();
        horizontal >= self.inner_radius - tolerance
            && horizontal <= self.outer_radius + tolerance
            && offset.y >= self.min_height - tolerance
            && offset.y <= self.max_height + tolerance
    }
}

// ============================================================================
// SAMPLERS
// ============================================================================

/// Supplies random destinations inside a region.
///
/// Implementations must draw all randomness from `rng` so a seeded generator
/// reproduces the same sequence of points.
pub trait AreaSampler {
    fn sample_position(&self, rng: &mut dyn RngCore, anchor: Vec3, region: &SwimRegion) -> Vec3;
}

/// Uniform heading, radius and height within the band. Points are not
/// area-uniform (they cluster toward the inner edge), which is fine for
/// background wandering.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnulusArea;

impl AreaSampler for AnnulusArea {
    fn sample_position(&self, rng: &mut dyn RngCore, anchor: Vec3, region: &SwimRegion) -> Vec3 {
        let angle = rng.gen_range(0.0..TAU);
        let radius = sample_closed(rng, region.inner_radius, region.outer_radius);
        let height = sample_closed(rng, region.min_height, region.max_height);
        anchor + Vec3::new(angle.cos() * radius, height, angle.sin() * radius)
    }
}

/// Always answers with the same point. Handy for pinning a swimmer's path.
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedArea(pub Vec3);

#[cfg(test)]
impl AreaSampler for FixedArea {
    fn sample_position(&self, _rng: &mut dyn RngCore, _anchor: Vec3, _region: &SwimRegion) -> Vec3 {
        self.0
    }
}

fn sample_closed(rng: &mut dyn RngCore, min: f32, max: f32) -> f32 {
    if max > min {
        rng.gen_range(min..=max)
    } else {
        min
    }
}
