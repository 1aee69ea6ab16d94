//! Look-at camera.
//!
//! # Coordinate System
//!
//! Uses a **left-handed** view space:
//! - X: positive right
//! - Y: positive up (world Y is always the up vector)
//! - Z: positive forward, from the eye towards the target
//!
//! A surface turned towards the camera therefore has a negative view-space
//! normal z, which is what back-face culling tests against.

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

/// Default eye distance from the origin along +Z.
///
/// Screen offsets are divided by the mesh origin's view depth and never
/// scaled to the buffer, so a unit mesh only spans a useful share of the
/// frame when the eye sits this close.
pub const DEFAULT_DISTANCE: f32 = 0.05;

/// A camera described by where it sits and what it looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 0.0, DEFAULT_DISTANCE), Vec3::ZERO)
    }
}

impl Camera {
    pub fn new(position: Vec3, target: Vec3) -> Self {
        Self { position, target }
    }

    /// Normalized direction from the eye to the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize()
    }

    /// Computes the view matrix for the rendering pipeline.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position, self.target, Vec3::UP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn forward_points_at_target() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        assert_relative_eq!(camera.forward().z, -1.0, epsilon = 1e-6);
    }

    #[test]
    fn view_matrix_is_valid() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -5.0), Vec3::ZERO);
        let view = camera.view_matrix();

        // Transform origin to view space - should be 5 units in front
        let origin = view.transform_point(Vec3::ZERO);
        assert_relative_eq!(origin.z, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn normal_facing_camera_has_negative_view_z() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO);
        let n = camera.view_matrix().transform_normal(Vec3::FORWARD);
        assert!(n.z < 0.0);
    }

    #[test]
    fn default_eye_sits_close_on_positive_z() {
        let camera = Camera::default();
        assert_eq!(camera.position, Vec3::new(0.0, 0.0, DEFAULT_DISTANCE));
        assert_eq!(camera.target, Vec3::ZERO);
        let origin = camera.view_matrix().transform_point(Vec3::ZERO);
        assert_relative_eq!(origin.z, DEFAULT_DISTANCE, epsilon = 1e-6);
    }

    #[test]
    fn world_up_stays_up() {
        let camera = Camera::new(Vec3::new(3.0, 1.0, 5.0), Vec3::ZERO);
        let up = camera.view_matrix().transform_normal(Vec3::UP);
        assert!(up.y > 0.0);
    }
}
