//! Point and pose types on the arena's horizontal plane.
//!
//! The rendering host uses a y-up 3D scene, so the navigation plane is
//! spanned by x and z. Depth (the host's y axis) is tracked separately on
//! the vehicle state and never enters planar geometry.

use serde::{Deserialize, Serialize};

use crate::core::math::normalize_angle;

/// A point on the horizontal (x, z) plane, in world units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate.
    pub x: f32,
    /// Z coordinate.
    pub z: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Point reached by travelling `distance` along `heading` from here.
    #[inline]
    pub fn offset(&self, heading: f32, distance: f32) -> Point2D {
        Point2D::new(
            self.x + heading.cos() * distance,
            self.z + heading.sin() * distance,
        )
    }

    /// Heading from this point toward another.
    #[inline]
    pub fn heading_to(&self, other: &Point2D) -> f32 {
        (other.z - self.z).atan2(other.x - self.x)
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, z: 0.0 }
    }
}

/// Vehicle pose on the plane.
///
/// Position in world units and heading in radians, normalized to [-π, π].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// X position.
    pub x: f32,
    /// Z position.
    pub z: f32,
    /// Heading in radians, normalized to [-π, π].
    pub heading: f32,
}

impl Pose {
    /// Create a new pose with heading normalized to [-π, π].
    #[inline]
    pub fn new(x: f32, z: f32, heading: f32) -> Self {
        Self {
            x,
            z,
            heading: normalize_angle(heading),
        }
    }

    /// Pose at the origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            z: 0.0,
            heading: 0.0,
        }
    }

    /// Position component of the pose.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.z)
    }

    /// Distance from this pose to a point.
    #[inline]
    pub fn distance_to(&self, point: &Point2D) -> f32 {
        self.position().distance(point)
    }

    /// Heading from this pose toward a point.
    #[inline]
    pub fn heading_to(&self, point: &Point2D) -> f32 {
        self.position().heading_to(point)
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}
