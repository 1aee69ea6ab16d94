//! Transform component for meshes.
//!
//! Provides a [`Transform`] struct with a fluent API for managing position
//! and rotation (Euler angles). The caller updates it between frames; the
//! engine only reads it.

use crate::math::{mat4::Mat4, vec3::Vec3};

/// A 3D transform with position and rotation (Euler angles).
///
/// Provides a fluent API where mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// transform
///     .set_position_xyz(5.0, 2.0, 0.0)
///     .rotate_y(0.1);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians: x=pitch, y=yaw, z=roll
}

impl Transform {
    /// Create a new transform at the origin with no rotation.
    pub fn new() -> Self {
        Self::default()
    }

    // ============ Position ============

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    /// Translate by a delta vector.
    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    // ============ Rotation ============

    /// Get the rotation (Euler angles in radians).
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    /// Set the rotation (Euler angles in radians).
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.rotation = rotation;
        self
    }

    /// Add a delta rotation (Euler angles in radians).
    pub fn rotate(&mut self, delta: Vec3) -> &mut Self {
        self.rotation = self.rotation + delta;
        self
    }

    /// Rotate around the X axis (pitch).
    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    /// Rotate around the Y axis (yaw).
    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    /// Rotate around the Z axis (roll).
    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    // ============ Matrix Generation ============

    /// Generate the world matrix.
    ///
    /// Order: Translation * YawPitchRoll (rotation applied first, then translation)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::rotation_yaw_pitch_roll(self.rotation.y, self.rotation.x, self.rotation.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_default() {
        let t = Transform::default();
        assert_eq!(t.position(), Vec3::ZERO);
        assert_eq!(t.rotation(), Vec3::ZERO);
    }

    #[test]
    fn test_fluent_api() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 2.0, 3.0).rotate_y(0.5).rotate_x(0.25);

        assert_eq!(t.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_relative_eq!(t.rotation().y, 0.5);
        assert_relative_eq!(t.rotation().x, 0.25);
    }

    #[test]
    fn test_translate() {
        let mut t = Transform::new();
        t.set_position_xyz(1.0, 0.0, 0.0)
            .translate(Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(t.position().x, 3.0);
    }

    #[test]
    fn test_to_matrix_identity() {
        assert_eq!(Transform::default().to_matrix(), Mat4::identity());
    }

    #[test]
    fn test_rotation_before_translation() {
        let mut t = Transform::new();
        t.set_position_xyz(10.0, 0.0, 0.0).rotate_y(FRAC_PI_2);
        // (1,0,0) rotates onto -Z first, then shifts by +10 on X
        let p = t.to_matrix().transform_point(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-5);
    }
}
