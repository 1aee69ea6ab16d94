//! Scalar helpers shared by lighting and scanline interpolation.

use crate::math::vec3::Vec3;

/// Clamps `value` into `[lo, hi]`.
#[inline]
pub fn clamp(value: f32, lo: f32, hi: f32) -> f32 {
    value.max(lo).min(hi)
}

#[inline]
pub fn clamp01(value: f32) -> f32 {
    clamp(value, 0.0, 1.0)
}

/// Linear interpolation between `min` and `max`.
///
/// The gradient is clamped to [0, 1] on every call; rounding on the edge
/// walk can push it a hair outside the range even when the geometry says it
/// cannot be.
#[inline]
pub fn interpolate(min: f32, max: f32, gradient: f32) -> f32 {
    min + (max - min) * clamp01(gradient)
}

/// Lambertian term for a point light: cosine between the surface normal and
/// the direction towards the light, floored at zero.
#[inline]
pub fn compute_ndotl(world_position: Vec3, normal: Vec3, light_position: Vec3) -> f32 {
    let normal = normal.normalize();
    let light_direction = (light_position - world_position).normalize();
    normal.dot(light_direction).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn interpolate_hits_endpoints() {
        assert_eq!(interpolate(2.0, 6.0, 0.0), 2.0);
        assert_eq!(interpolate(2.0, 6.0, 1.0), 6.0);
        assert_eq!(interpolate(2.0, 6.0, 0.25), 3.0);
    }

    #[test]
    fn interpolate_clamps_gradient() {
        assert_eq!(interpolate(2.0, 6.0, 1.0001), 6.0);
        assert_eq!(interpolate(2.0, 6.0, -0.5), 2.0);
    }

    #[test]
    fn clamp_respects_bounds() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-5.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    #[test]
    fn ndotl_facing_light_is_one() {
        let light = Vec3::new(0.0, 10.0, 10.0);
        let normal = Vec3::new(0.0, 1.0, 1.0);
        assert_relative_eq!(compute_ndotl(Vec3::ZERO, normal, light), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn ndotl_facing_away_is_zero() {
        let light = Vec3::new(0.0, 10.0, 10.0);
        assert_eq!(compute_ndotl(Vec3::ZERO, Vec3::new(0.0, -1.0, -1.0), light), 0.0);
    }

    #[test]
    fn ndotl_ignores_normal_length() {
        let light = Vec3::new(0.0, 10.0, 10.0);
        let a = compute_ndotl(Vec3::ZERO, Vec3::FORWARD, light);
        let b = compute_ndotl(Vec3::ZERO, Vec3::FORWARD * 7.0, light);
        assert_relative_eq!(a, b, epsilon = 1e-6);
        assert_relative_eq!(a, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }
}
