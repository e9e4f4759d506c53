//! The fixed instance list: two hexagonal "books" of quads plus the one
//! live quad the keyboard drives.

use glam::{Mat4, Vec3};

use crate::controls::ControlState;

/// Uniform scale applied to every instance.
pub const INSTANCE_SCALE: f32 = 0.2;

/// One drawable copy of the base geometry with its own model transform.
///
/// A single record per instance; position and the three rotation angles
/// travel together instead of being correlated across parallel arrays.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instance {
    pub position: Vec3,
    /// Rotation around Y, degrees.
    pub rotation_y: f32,
    /// Rotation around X, degrees.
    pub rotation_x: f32,
    /// Rotation around Z, degrees.
    pub rotation_z: f32,
}

impl Instance {
    pub const fn new(position: Vec3, rotation_y: f32, rotation_x: f32, rotation_z: f32) -> Self {
        Self {
            position,
            rotation_y,
            rotation_x,
            rotation_z,
        }
    }

    /// Model matrix: translate ∘ rotY ∘ rotX ∘ rotZ ∘ scale.
    ///
    /// Scale is innermost and translation outermost; the rotation order is
    /// part of the scene's look and must not change.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_rotation_y(self.rotation_y.to_radians())
            * Mat4::from_rotation_x(self.rotation_x.to_radians())
            * Mat4::from_rotation_z(self.rotation_z.to_radians())
            * Mat4::from_scale(Vec3::splat(INSTANCE_SCALE))
    }
}

/// The twelve fixed quads forming the two book clusters.
///
/// Values carried over verbatim from the scene this sketch renders,
/// duplicate entry included.
pub const BASE_INSTANCES: [Instance; 12] = [
    // Top book.
    Instance::new(Vec3::new(-0.5, 0.0, 0.0), 0.0, 0.0, 0.0),
    Instance::new(Vec3::new(-0.5, 0.0, -0.1), 0.0, 180.0, 0.0),
    Instance::new(Vec3::new(-0.5, 0.1, 0.0), 0.0, 90.0, 0.0),
    Instance::new(Vec3::new(-0.5, -0.1, 0.0), 0.0, 90.0, 90.0),
    Instance::new(Vec3::new(-0.4, 0.0, 0.0), 90.0, 0.0, 0.0),
    Instance::new(Vec3::new(-0.6, 0.0, 0.0), 90.0, 0.0, 0.0),
    // Bottom book.
    Instance::new(Vec3::new(-0.5, -0.2, 0.0), 0.0, 0.0, 0.0),
    Instance::new(Vec3::new(-0.5, -0.2, -0.1), 0.0, 180.0, 0.0),
    Instance::new(Vec3::new(-0.5, -0.3, 0.0), 0.0, 90.0, 0.0),
    Instance::new(Vec3::new(-0.5, -0.3, 0.0), 0.0, 90.0, 90.0),
    Instance::new(Vec3::new(-0.4, -0.2, 0.0), 90.0, 0.0, 0.0),
    Instance::new(Vec3::new(-0.6, -0.2, 0.0), 90.0, 0.0, 0.0),
];

/// Total number of instances drawn per frame.
pub const INSTANCE_COUNT: usize = BASE_INSTANCES.len() + 1;

/// The full draw list for one frame: the fixed clusters plus the live quad
/// built from the current control state.
pub fn instances(state: &ControlState) -> Vec<Instance> {
    let mut list = BASE_INSTANCES.to_vec();
    list.push(Instance::new(
        Vec3::new(state.offset_x, state.offset_y, state.offset_z),
        state.rotation_y,
        state.rotation_x,
        state.rotation_z,
    ));
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thirteen_instances_per_frame() {
        let list = instances(&ControlState::default());
        assert_eq!(list.len(), INSTANCE_COUNT);
        assert_eq!(list.len(), 13);
        assert_eq!(&list[..12], &BASE_INSTANCES[..]);
    }

    #[test]
    fn live_instance_tracks_control_state() {
        let state = ControlState {
            offset_x: 0.25,
            offset_y: -0.5,
            offset_z: 1.0,
            rotation_y: 45.0,
            rotation_x: 10.0,
            rotation_z: -30.0,
            ..ControlState::default()
        };
        let live = instances(&state)[12];
        assert_eq!(live.position, Vec3::new(0.25, -0.5, 1.0));
        assert_eq!(live.rotation_y, 45.0);
        assert_eq!(live.rotation_x, 10.0);
        assert_eq!(live.rotation_z, -30.0);
    }

    #[test]
    fn untouched_live_instance_is_translate_then_scale() {
        let state = ControlState {
            offset_x: 0.3,
            ..ControlState::default()
        };
        let live = instances(&state)[12];
        let expected = Mat4::from_translation(Vec3::new(0.3, 0.0, 0.0))
            * Mat4::from_scale(Vec3::splat(INSTANCE_SCALE));
        assert!(live.model_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn model_matrix_rotation_order_is_y_x_z() {
        let instance = Instance::new(Vec3::new(1.0, 2.0, 3.0), 30.0, 60.0, 90.0);
        let expected = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0))
            * Mat4::from_rotation_y(30.0_f32.to_radians())
            * Mat4::from_rotation_x(60.0_f32.to_radians())
            * Mat4::from_rotation_z(90.0_f32.to_radians())
            * Mat4::from_scale(Vec3::splat(INSTANCE_SCALE));
        assert!(instance.model_matrix().abs_diff_eq(expected, 1e-6));
    }
}
