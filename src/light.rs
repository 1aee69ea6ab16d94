//! Lighting types for the renderer.

use crate::math::vec3::Vec3;
use crate::shading::compute_ndotl;

/// A single point light shading every mesh in the scene.
///
/// Only the diffuse (Lambertian) term is modelled: no falloff, no ambient
/// floor, no specular.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
}

impl Default for PointLight {
    fn default() -> Self {
        Self::new(Vec3::new(0.0, 10.0, 10.0))
    }
}

impl PointLight {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }

    /// Light intensity in [0.0, 1.0] reaching a surface point with the given
    /// world-space normal.
    #[inline]
    pub fn intensity(&self, world_position: Vec3, normal: Vec3) -> f32 {
        compute_ndotl(world_position, normal, self.position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direct_illumination() {
        // Light straight above, normal facing up
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0));
        assert!((light.intensity(Vec3::ZERO, Vec3::UP) - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_no_illumination() {
        let light = PointLight::new(Vec3::new(0.0, 10.0, 0.0));
        assert!(light.intensity(Vec3::ZERO, -Vec3::UP) == 0.0);
    }

    #[test]
    fn test_angled_illumination() {
        // Default light sits at 45 degrees above a +Z facing surface
        let light = PointLight::default();
        let intensity = light.intensity(Vec3::ZERO, Vec3::FORWARD);
        assert!((intensity - 0.707).abs() < 0.01);
    }

    #[test]
    fn test_position_dependent() {
        // Unlike a directional light, moving the surface changes the angle
        let light = PointLight::new(Vec3::new(0.0, 0.0, 10.0));
        let center = light.intensity(Vec3::ZERO, Vec3::FORWARD);
        let off_axis = light.intensity(Vec3::new(10.0, 0.0, 0.0), Vec3::FORWARD);
        assert!(center > off_axis);
    }
}
