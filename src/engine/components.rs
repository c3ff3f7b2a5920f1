// Core ECS components for the engine
// These are reusable across any scene that hosts swimmers

use bevy_ecs::prelude::*;
use glam::{Mat3, Quat, Vec3};

/// Below this squared length a look vector is treated as zero.
const LOOK_EPSILON_SQ: f32 = 1e-10;

/// Position and facing of an entity in 3D space.
///
/// Local +Z is "forward", matching the host scene convention the fish
/// behaviour was authored against.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self { position, ..Default::default() }
    }

    /// Unit vector the entity is facing.
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Rotate so `forward()` points from the current position toward `target`.
    ///
    /// A zero look vector leaves the rotation untouched. A look vector parallel
    /// to `up` has no well-defined roll, so the shortest arc from +Z is used.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let look = target - self.position;
        if look.length_squared() < LOOK_EPSILON_SQ {
            return;
        }
        let z = look.normalize();
        let x = up.cross(z);
        if x.length_squared() < LOOK_EPSILON_SQ {
            self.rotation = Quat::from_rotation_arc(Vec3::Z, z);
            return;
        }
        let x = x.normalize();
        let y = z.cross(x);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize();
    }
}

/// Reference point handed to the area sampler when a swimmer picks a new
/// destination. Usually the position of the container the fish lives in.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq)]
pub struct SwimAnchor(pub Vec3);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Vec3::new(100.0, 5.0, 0.0), Vec3::X)]
    #[case(Vec3::new(0.0, 5.0, -40.0), Vec3::NEG_Z)]
    #[case(Vec3::new(-3.0, 5.0, 0.0), Vec3::NEG_X)]
    fn look_at_faces_horizontal_target(#[case] target: Vec3, #[case] expected: Vec3) {
        let mut t = Transform::from_position(Vec3::new(0.0, 5.0, 0.0));
        t.look_at(target, Vec3::Y);
        let f = t.forward();
        assert_relative_eq!(f.x, expected.x, epsilon = 1e-5);
        assert_relative_eq!(f.y, expected.y, epsilon = 1e-5);
        assert_relative_eq!(f.z, expected.z, epsilon = 1e-5);
    }

    #[test]
    fn look_at_keeps_world_up_for_sloped_target() {
        let mut t = Transform::default();
        t.look_at(Vec3::new(10.0, 10.0, 0.0), Vec3::Y);
        let up = t.rotation * Vec3::Y;
        // No roll: local right stays horizontal.
        assert_relative_eq!((t.rotation * Vec3::X).y, 0.0, epsilon = 1e-5);
        assert!(up.y > 0.0);
        let diagonal = Vec3::new(1.0, 1.0, 0.0).normalize();
        assert_relative_eq!(t.forward().dot(diagonal), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn look_at_zero_vector_keeps_rotation() {
        let mut t = Transform::from_position(Vec3::ONE);
        t.rotation = Quat::from_rotation_y(1.0);
        let before = t.rotation;
        t.look_at(Vec3::ONE, Vec3::Y);
        assert_eq!(t.rotation, before);
    }

    #[test]
    fn look_at_straight_up_uses_shortest_arc() {
        let mut t = Transform::default();
        t.look_at(Vec3::new(0.0, 7.0, 0.0), Vec3::Y);
        assert_relative_eq!(t.forward().y, 1.0, epsilon = 1e-5);
    }
}
