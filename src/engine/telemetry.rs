//! UI-facing mission telemetry.
//!
//! A plain-value snapshot assembled once per request; the host reads it
//! or diffs it for change detection. Battery is derived telemetry only
//! and never gates behavior.

use serde::{Deserialize, Serialize};

use crate::behavior::BehaviorState;
use crate::core::types::Pose;
use crate::mission::SearchPattern;
use crate::state::VehicleMode;
use crate::world::HeatCategory;

/// Snapshot of everything the control/HUD layer displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissionTelemetry {
    /// Current operating mode.
    pub mode: VehicleMode,

    /// Active search pattern.
    pub pattern: SearchPattern,

    /// Current behavior state.
    pub behavior: BehaviorState,

    /// Human-readable mission status line.
    pub status: String,

    /// Targets collected so far.
    pub targets_found: u32,

    /// Percent of the arena revealed from fog.
    pub searched_percent: f32,

    /// Heat categories currently detected, deduplicated.
    pub detected_heat: Vec<HeatCategory>,

    /// Vehicle planar pose.
    pub pose: Pose,

    /// Vehicle depth (<= 0).
    pub depth: f32,

    /// Remaining battery percentage, drained by distance travelled.
    pub battery_percent: f32,

    /// Whether the active pattern has been exhausted.
    pub pattern_complete: bool,
}
