use glam::{Mat4, Vec3};

/// An orbit-style camera described by three rotation angles in degrees.
///
/// The view is a fixed one-unit pullback along Z with the Z, X, and then Y
/// rotations applied inside it, which is the order the sketch has always
/// composed them in.
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    /// Rotation around each axis, degrees.
    pub angles_deg: Vec3,
    /// Vertical field of view, degrees.
    pub fov_y_deg: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            angles_deg: Vec3::ZERO,
            fov_y_deg: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    /// A camera rotated by the given angles (degrees) around X, Y, and Z.
    pub fn from_angles(x: f32, y: f32, z: f32) -> Self {
        Self {
            angles_deg: Vec3::new(x, y, z),
            ..Self::default()
        }
    }

    /// World-to-view matrix: translate(0,0,-1) ∘ rotZ ∘ rotX ∘ rotY.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0))
            * Mat4::from_rotation_z(self.angles_deg.z.to_radians())
            * Mat4::from_rotation_x(self.angles_deg.x.to_radians())
            * Mat4::from_rotation_y(self.angles_deg.y.to_radians())
    }

    /// Perspective projection for the given aspect ratio (width / height).
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_deg.to_radians(), aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_angles_is_a_pure_pullback() {
        let view = Camera::new().view_matrix();
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0));
        assert!(view.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn view_rotation_order_is_z_x_y() {
        let camera = Camera::from_angles(10.0, 20.0, 30.0);
        let expected = Mat4::from_translation(Vec3::new(0.0, 0.0, -1.0))
            * Mat4::from_rotation_z(30.0_f32.to_radians())
            * Mat4::from_rotation_x(10.0_f32.to_radians())
            * Mat4::from_rotation_y(20.0_f32.to_radians());
        assert!(camera.view_matrix().abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn projection_scales_with_aspect() {
        let camera = Camera::new();
        let wide = camera.projection_matrix(16.0 / 9.0);
        let square = camera.projection_matrix(1.0);
        // Same vertical FOV, different horizontal scale.
        assert!((wide.y_axis.y - square.y_axis.y).abs() < 1e-6);
        assert!(wide.x_axis.x < square.x_axis.x);
    }
}
