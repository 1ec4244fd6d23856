//! Mission waypoints.

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// Pattern metadata attached to a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaypointTag {
    /// Grid sweep cell.
    GridCell { row: u32, col: u32 },

    /// Point on a perimeter layer (0 = outermost).
    PerimeterEdge { layer: u32 },

    /// Point on the expanding spiral.
    Spiral,

    /// Random patrol sample.
    Patrol,
}

/// One mission waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    /// Position on the plane.
    pub position: Point2D,

    /// Which part of the pattern produced it.
    pub tag: WaypointTag,
}

impl Waypoint {
    /// Create a waypoint.
    pub fn new(position: Point2D, tag: WaypointTag) -> Self {
        Self { position, tag }
    }
}
