//! Arena bounds and wall tests.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// The square operating arena, centered on the origin.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArenaBounds {
    /// Half-extent of the arena along both axes.
    half_extent: f32,

    /// Margin inside the walls treated as unusable.
    wall_margin: f32,
}

impl ArenaBounds {
    /// Create arena bounds. `half_extent` must exceed `wall_margin`;
    /// validated upstream by [`crate::config::SimConfig::validate`].
    pub fn new(half_extent: f32, wall_margin: f32) -> Self {
        Self {
            half_extent,
            wall_margin,
        }
    }

    /// Half-extent of the outer walls.
    #[inline]
    pub fn half_extent(&self) -> f32 {
        self.half_extent
    }

    /// Half-extent of the usable interior (walls minus margin).
    #[inline]
    pub fn usable_half_extent(&self) -> f32 {
        self.half_extent - self.wall_margin
    }

    /// Full arena span (wall to wall).
    #[inline]
    pub fn span(&self) -> f32 {
        2.0 * self.half_extent
    }

    /// Whether a point is inside the outer walls.
    #[inline]
    pub fn contains(&self, point: &Point2D) -> bool {
        point.x.abs() <= self.half_extent && point.z.abs() <= self.half_extent
    }

    /// Whether a point is inside the usable interior.
    #[inline]
    pub fn contains_usable(&self, point: &Point2D) -> bool {
        let usable = self.usable_half_extent();
        point.x.abs() <= usable && point.z.abs() <= usable
    }

    /// Clamp a point to the usable interior, with an extra inward inset.
    ///
    /// Used to collapse out-of-bounds motion targets onto the boundary
    /// instead of teleporting.
    #[inline]
    pub fn clamp_inside(&self, point: &Point2D, inset: f32) -> Point2D {
        let limit = (self.usable_half_extent() - inset).max(0.0);
        Point2D::new(point.x.clamp(-limit, limit), point.z.clamp(-limit, limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_containment() {
        let arena = ArenaBounds::new(20.0, 1.0);
        assert!(arena.contains(&Point2D::new(19.5, -19.5)));
        assert!(!arena.contains(&Point2D::new(20.5, 0.0)));
        assert!(arena.contains_usable(&Point2D::new(18.9, 0.0)));
        assert!(!arena.contains_usable(&Point2D::new(19.5, 0.0)));
    }

    #[test]
    fn test_clamp_inside() {
        let arena = ArenaBounds::new(20.0, 1.0);
        let clamped = arena.clamp_inside(&Point2D::new(25.0, -30.0), 0.5);
        assert_relative_eq!(clamped.x, 18.5);
        assert_relative_eq!(clamped.z, -18.5);

        // Interior points pass through untouched.
        let inside = arena.clamp_inside(&Point2D::new(3.0, 4.0), 0.5);
        assert_relative_eq!(inside.x, 3.0);
        assert_relative_eq!(inside.z, 4.0);
    }

    #[test]
    fn test_span() {
        let arena = ArenaBounds::new(20.0, 1.0);
        assert_relative_eq!(arena.span(), 40.0);
        assert_relative_eq!(arena.usable_half_extent(), 19.0);
    }
}
