//! Mathematical primitives for planar navigation.
//!
//! Functions for angle normalization and angular arithmetic. Headings are
//! radians on the arena's horizontal plane, normalized to [-π, π].

use std::f32::consts::PI;

/// Normalize angle to [-π, π].
///
/// # Example
/// ```
/// use varuna_nav::core::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-6);
/// assert!((normalize_angle(-3.0 * PI) - (-PI)).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * PI);
    if a > PI {
        a -= 2.0 * PI;
    } else if a < -PI {
        a += 2.0 * PI;
    }
    a
}

/// Shortest angular difference from angle `a` to angle `b`.
///
/// Returns the signed angle you need to add to `a` to reach `b`,
/// taking the shortest path around the circle.
#[inline]
pub fn angle_diff(a: f32, b: f32) -> f32 {
    normalize_angle(b - a)
}

/// Linear interpolation between two angles, taking the shortest path.
///
/// `t` should be in [0, 1] where 0 returns `a` and 1 returns `b`.
#[inline]
pub fn angle_lerp(a: f32, b: f32, t: f32) -> f32 {
    normalize_angle(a + angle_diff(a, b) * t)
}

/// Frame-rate independent exponential smoothing factor.
///
/// Converts a per-second approach `rate` and a timestep into the fraction
/// of remaining distance to cover this step. Always in [0, 1].
#[inline]
pub fn smoothing_alpha(rate: f32, dt_secs: f32) -> f32 {
    1.0 - (-rate * dt_secs).exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_normalize_angle_identity() {
        assert_relative_eq!(normalize_angle(0.0), 0.0);
        assert_relative_eq!(normalize_angle(1.0), 1.0);
        assert_relative_eq!(normalize_angle(-1.0), -1.0);
    }

    #[test]
    fn test_normalize_angle_wraps() {
        assert_relative_eq!(normalize_angle(2.0 * PI), 0.0, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(3.0 * PI), PI, epsilon = 1e-6);
        assert_relative_eq!(normalize_angle(-3.0 * PI), -PI, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_diff_crossing_pi() {
        assert_relative_eq!(angle_diff(PI - 0.1, -PI + 0.1), 0.2, epsilon = 1e-6);
        assert_relative_eq!(angle_diff(-PI + 0.1, PI - 0.1), -0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_angle_lerp_shortest_path() {
        assert_relative_eq!(angle_lerp(0.0, PI / 2.0, 0.5), PI / 4.0);
        let crossing = angle_lerp(PI - 0.1, -PI + 0.1, 0.5);
        assert_relative_eq!(crossing, PI, epsilon = 1e-6);
    }

    #[test]
    fn test_smoothing_alpha_bounds() {
        assert_relative_eq!(smoothing_alpha(3.0, 0.0), 0.0);
        let a = smoothing_alpha(3.0, 0.016);
        assert!(a > 0.0 && a < 1.0);
        // Large timesteps converge toward 1 without overshooting.
        assert!(smoothing_alpha(3.0, 10.0) < 1.0 + 1e-6);
        assert!(smoothing_alpha(3.0, 10.0) > 0.99);
    }
}
