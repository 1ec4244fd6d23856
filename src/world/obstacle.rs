//! Static obstacles.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// A static circular obstacle. Created at arena setup, destroyed on reset.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Obstacle {
    /// Stable identifier within the arena's lifetime.
    pub id: u32,

    /// Center position.
    pub position: Point2D,

    /// Footprint radius.
    pub radius: f32,
}

impl Obstacle {
    /// Create a new obstacle.
    pub fn new(id: u32, position: Point2D, radius: f32) -> Self {
        Self {
            id,
            position,
            radius,
        }
    }

    /// Whether a point falls inside the footprint, inflated by `clearance`.
    #[inline]
    pub fn contains(&self, point: &Point2D, clearance: f32) -> bool {
        let r = self.radius + clearance;
        self.position.distance_squared(point) < r * r
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_footprint_test() {
        let obstacle = Obstacle::new(0, Point2D::new(0.0, 0.0), 3.0);
        assert!(obstacle.contains(&Point2D::new(2.9, 0.0), 0.0));
        assert!(!obstacle.contains(&Point2D::new(3.1, 0.0), 0.0));
        // Clearance inflates the footprint.
        assert!(obstacle.contains(&Point2D::new(3.4, 0.0), 0.5));
    }
}
