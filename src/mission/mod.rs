//! Mission planning: search patterns and waypoint sequencing.

pub mod planner;
pub mod waypoint;

pub use planner::{MissionPlanner, PatternProgress, SearchPattern};
pub use waypoint::{Waypoint, WaypointTag};
