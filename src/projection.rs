//! Perspective projection parameters.
//!
//! The [`Projection`] struct is the single source of truth for the
//! perspective parameters (FOV, aspect ratio, near/far planes).

use crate::math::mat4::Mat4;

pub const DEFAULT_FOV: f32 = 0.78;
pub const DEFAULT_Z_NEAR: f32 = 0.01;
pub const DEFAULT_Z_FAR: f32 = 1.0;

/// Perspective projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Vertical field of view in radians.
    fov_y: f32,
    /// Aspect ratio (width / height).
    aspect_ratio: f32,
    z_near: f32,
    z_far: f32,
}

impl Projection {
    /// Creates a new projection with the given parameters.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near plane distance (must be > 0)
    /// * `z_far` - Far plane distance (must be > z_near)
    pub fn new(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    pub fn fov_y(&self) -> f32 {
        self.fov_y
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn z_near(&self) -> f32 {
        self.z_near
    }

    pub fn z_far(&self) -> f32 {
        self.z_far
    }

    /// Updates the aspect ratio (typically called on resize).
    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.aspect_ratio = aspect_ratio;
    }

    /// Generates the left-handed perspective projection matrix.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_fov_lh(self.fov_y, self.aspect_ratio, self.z_near, self.z_far)
    }
}
