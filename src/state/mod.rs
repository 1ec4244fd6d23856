//! Shared mutable vehicle state and manual control intent.
//!
//! [`VehicleState`] is written once per tick by the motion integrator and
//! read by every other component. [`ControlIntent`] is the host-mutated
//! input structure honored verbatim in manual mode.

use serde::{Deserialize, Serialize};

use crate::core::types::Pose;

/// Operating mode of the vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum VehicleMode {
    /// Keyboard/manual control; autonomous behavior is bypassed.
    Manual,

    /// Standard autonomous search.
    #[default]
    Autonomous,

    /// Autonomous search with extended detection range, heavier
    /// heat-signal weighting, and faster motion.
    RescuePriority,
}

impl VehicleMode {
    /// Whether the arbiter is in charge in this mode.
    pub fn is_autonomous(&self) -> bool {
        !matches!(self, VehicleMode::Manual)
    }

    /// Display string for telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleMode::Manual => "MANUAL",
            VehicleMode::Autonomous => "AUTONOMOUS",
            VehicleMode::RescuePriority => "RESCUE_PRIORITY",
        }
    }
}

/// Vehicle pose and motion state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct VehicleState {
    /// Planar pose (position + heading).
    pub pose: Pose,

    /// Depth below the surface (host y axis, <= 0).
    pub depth: f32,

    /// Current operating mode.
    pub mode: VehicleMode,

    /// Host-adjustable speed scale applied on top of mode speeds.
    pub speed_multiplier: f32,
}

impl VehicleState {
    /// Vehicle at a given planar pose, surfaced, in autonomous mode.
    pub fn at(pose: Pose) -> Self {
        Self {
            pose,
            depth: 0.0,
            mode: VehicleMode::Autonomous,
            speed_multiplier: 1.0,
        }
    }
}

impl Default for VehicleState {
    fn default() -> Self {
        Self::at(Pose::identity())
    }
}

/// Manual control intent, mutated by the host's input layer.
///
/// All flags may be set simultaneously; opposing flags cancel out.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ControlIntent {
    pub forward: bool,
    pub backward: bool,
    pub turn_left: bool,
    pub turn_right: bool,
    pub dive: bool,
    pub surface: bool,
}

impl ControlIntent {
    /// Clear all flags.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Net translation sign: +1 forward, -1 backward, 0 idle.
    pub fn translation(&self) -> f32 {
        (self.forward as i8 - self.backward as i8) as f32
    }

    /// Net turn sign: +1 left (CCW), -1 right, 0 idle.
    pub fn turn(&self) -> f32 {
        (self.turn_left as i8 - self.turn_right as i8) as f32
    }

    /// Net vertical sign: +1 surface, -1 dive, 0 idle.
    pub fn vertical(&self) -> f32 {
        (self.surface as i8 - self.dive as i8) as f32
    }
}
