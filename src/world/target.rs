//! Heat-signature targets.
//!
//! Targets carry a category, a derived priority rank, and a detection
//! lifecycle advanced by the scanner (Detected), the behavior arbiter
//! (Locked), and the engine (Collected).

use serde::{Deserialize, Serialize};

use crate::core::types::Point2D;

/// Classification of a heat signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HeatCategory {
    Survivor,
    Injured,
    Deceased,
    Animal,
    Vehicle,
}

impl HeatCategory {
    /// Rescue priority rank. Lower = more urgent; `None` = not rescuable.
    pub fn priority_rank(&self) -> Option<u8> {
        match self {
            HeatCategory::Survivor => Some(1),
            HeatCategory::Injured => Some(2),
            HeatCategory::Deceased => Some(3),
            HeatCategory::Animal | HeatCategory::Vehicle => None,
        }
    }

    /// Whether this category is a rescue objective.
    pub fn is_rescuable(&self) -> bool {
        self.priority_rank().is_some()
    }

    /// Display string for telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeatCategory::Survivor => "SURVIVOR",
            HeatCategory::Injured => "INJURED",
            HeatCategory::Deceased => "DECEASED",
            HeatCategory::Animal => "ANIMAL",
            HeatCategory::Vehicle => "VEHICLE",
        }
    }
}

/// Detection lifecycle of a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DetectionState {
    /// Never seen by a sensor ray.
    #[default]
    Undetected,

    /// Seen by at least one sensor ray.
    Detected,

    /// The arbiter committed to approaching this target.
    Locked,

    /// Reached and collected; removed from the world.
    Collected,
}

/// A heat-signature target in the arena.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct HeatTarget {
    /// Stable identifier.
    pub id: u32,

    /// Position on the plane.
    pub position: Point2D,

    /// Signature classification.
    pub category: HeatCategory,

    /// Priority rank derived from the category at spawn.
    pub priority: Option<u8>,

    /// Detection lifecycle state.
    pub state: DetectionState,
}

impl HeatTarget {
    /// Create a new undetected target.
    pub fn new(id: u32, position: Point2D, category: HeatCategory) -> Self {
        Self {
            id,
            position,
            category,
            priority: category.priority_rank(),
            state: DetectionState::Undetected,
        }
    }

    /// Whether the target is still in play.
    pub fn is_active(&self) -> bool {
        self.state != DetectionState::Collected
    }

    /// Whether the target is a rescue objective.
    pub fn is_rescuable(&self) -> bool {
        self.category.is_rescuable()
    }
}
