//! Behavior arbiter: the per-tick autonomous state machine.
//!
//! Arbitrates between exploration, target lock-on, rotation scanning, and
//! stuck recovery. Abnormal conditions (no clear sensor direction,
//! motionlessness) are transitions here, never errors.

use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

use crate::behavior::direction::{DirectionContext, SectorMemory, choose_heading};
use crate::config::BehaviorConfig;
use crate::core::math::{angle_diff, normalize_angle};
use crate::core::types::Pose;
use crate::mission::MissionPlanner;
use crate::sensors::ScanResult;
use crate::state::{VehicleMode, VehicleState};
use crate::world::{DetectionState, WorldModel};

/// Heading error below which a rotation-scan increment counts as done.
const ROTATION_REACHED_RAD: f32 = 0.15;

/// Extra turn bias applied when reversing out in an emergency.
const EMERGENCY_TURN_BIAS_RAD: f32 = 0.5;

/// Autonomous behavior state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BehaviorState {
    /// Following the mission plan.
    #[default]
    Exploring,

    /// Committed to approaching one locked target.
    TargetLockOn,

    /// Rotating in increments, re-scanning for a clear direction.
    RotationScan,

    /// Forced perturbation to break out of a stuck pose.
    EmergencyManeuver,

    /// External manual override; arbitration suspended.
    Manual,
}

impl BehaviorState {
    /// Display string for telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            BehaviorState::Exploring => "EXPLORING",
            BehaviorState::TargetLockOn => "TARGET_LOCK_ON",
            BehaviorState::RotationScan => "ROTATION_SCAN",
            BehaviorState::EmergencyManeuver => "EMERGENCY_MANEUVER",
            BehaviorState::Manual => "MANUAL",
        }
    }
}

/// Output of one arbitration step, consumed by the motion integrator.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorDecision {
    /// Desired absolute heading.
    pub heading: f32,

    /// Speed fraction in [0, 1] of the mode's base speed.
    pub speed: f32,

    /// Request an immediate fresh scan next tick (rotation steps).
    pub force_scan: bool,
}

impl BehaviorDecision {
    fn hold(heading: f32) -> Self {
        Self {
            heading,
            speed: 0.0,
            force_scan: false,
        }
    }
}

/// The behavior arbiter.
pub struct BehaviorArbiter {
    config: BehaviorConfig,
    state: BehaviorState,

    /// Id of the locked target, if any.
    locked_target: Option<u32>,

    /// When the scanner first reported no clear path (debounce).
    no_path_since_ms: Option<u64>,

    /// Accumulated rotation during the current rotation scan.
    rotation_accum: f32,

    /// Heading the current rotation increment is turning toward.
    rotation_target: f32,

    /// Escape heading for the current emergency maneuver.
    emergency_heading: f32,

    /// When the current state was entered.
    entered_state_ms: u64,

    /// Sector-visit recency memory for direction scoring.
    memory: SectorMemory,
}

impl BehaviorArbiter {
    /// Create an arbiter in the exploring state.
    pub fn new(config: BehaviorConfig) -> Self {
        let memory = SectorMemory::new(
            config.sector_cell,
            config.sector_angle_buckets,
            config.sector_decay_ms,
        );
        Self {
            config,
            state: BehaviorState::Exploring,
            locked_target: None,
            no_path_since_ms: None,
            rotation_accum: 0.0,
            rotation_target: 0.0,
            emergency_heading: 0.0,
            entered_state_ms: 0,
            memory,
        }
    }

    /// Current behavior state.
    pub fn state(&self) -> BehaviorState {
        self.state
    }

    /// Id of the locked target, if any.
    pub fn locked_target(&self) -> Option<u32> {
        self.locked_target
    }

    /// Clear all transient state (timers, rotation, lock, memory).
    ///
    /// Called on mode/pattern switches and arena resets so no stale
    /// transition survives the change.
    pub fn reset(&mut self, world: &mut WorldModel, now_ms: u64) {
        self.release_lock(world);
        self.no_path_since_ms = None;
        self.rotation_accum = 0.0;
        self.memory.clear();
        if self.state != BehaviorState::Manual {
            self.enter(BehaviorState::Exploring, now_ms);
        }
    }

    /// Run one arbitration step.
    pub fn update(
        &mut self,
        scan: &ScanResult,
        world: &mut WorldModel,
        planner: &mut MissionPlanner,
        vehicle: &VehicleState,
        stuck: bool,
        detection_range: f32,
        now_ms: u64,
    ) -> BehaviorDecision {
        let pose = vehicle.pose;

        // Manual override wins over everything.
        if vehicle.mode == VehicleMode::Manual {
            if self.state != BehaviorState::Manual {
                self.release_lock(world);
                self.no_path_since_ms = None;
                self.rotation_accum = 0.0;
                self.enter(BehaviorState::Manual, now_ms);
            }
            return BehaviorDecision::hold(pose.heading);
        }
        if self.state == BehaviorState::Manual {
            self.enter(BehaviorState::Exploring, now_ms);
        }

        // A lock on a missing or collected target falls back immediately.
        if let Some(id) = self.locked_target
            && world.target(id).is_none_or(|t| !t.is_active())
        {
            log::info!("Locked target {} gone, resuming exploration", id);
            self.locked_target = None;
            if self.state == BehaviorState::TargetLockOn {
                self.enter(BehaviorState::Exploring, now_ms);
            }
        }

        if matches!(
            self.state,
            BehaviorState::Exploring | BehaviorState::TargetLockOn
        ) {
            self.try_acquire(scan, world, &pose, detection_range, now_ms);
        }

        let mode = vehicle.mode;
        match self.state {
            BehaviorState::Exploring => {
                self.explore(scan, world, planner, &pose, mode, stuck, now_ms)
            }
            BehaviorState::TargetLockOn => self.pursue(scan, world, &pose, mode, stuck, now_ms),
            BehaviorState::RotationScan => {
                self.rotate_scan(scan, world, planner, &pose, mode, stuck, now_ms)
            }
            BehaviorState::EmergencyManeuver => {
                self.emergency(scan, world, planner, &pose, mode, stuck, now_ms)
            }
            BehaviorState::Manual => BehaviorDecision::hold(pose.heading),
        }
    }

    /// Consider locking onto the best rescuable target the scanner sees.
    ///
    /// A new lock requires either no current lock or a target that
    /// outranks it by priority (ties broken by proximity).
    fn try_acquire(
        &mut self,
        scan: &ScanResult,
        world: &mut WorldModel,
        pose: &Pose,
        detection_range: f32,
        now_ms: u64,
    ) {
        let mut best: Option<(u32, u8, f32)> = None;
        for &i in &scan.heat_bearing {
            let ray = &scan.rays[i];
            if ray.target_distance > detection_range {
                continue;
            }
            let Some(id) = ray.target_id else { continue };
            let Some(target) = world.target(id) else {
                continue;
            };
            let Some(rank) = target.priority else {
                continue;
            };
            let candidate = (id, rank, ray.target_distance);
            best = match best {
                None => Some(candidate),
                Some(cur) if (rank, ray.target_distance) < (cur.1, cur.2) => Some(candidate),
                Some(cur) => Some(cur),
            };
        }

        let Some((id, rank, distance)) = best else {
            return;
        };
        if self.locked_target == Some(id) {
            return;
        }

        let outranks = match self.locked_target.and_then(|cur| world.target(cur)) {
            None => true,
            Some(current) => {
                let current_rank = current.priority.unwrap_or(u8::MAX);
                let current_distance = pose.distance_to(&current.position);
                rank < current_rank || (rank == current_rank && distance < current_distance)
            }
        };
        if !outranks {
            return;
        }

        self.release_lock(world);
        if let Some(target) = world.target_mut(id) {
            target.state = DetectionState::Locked;
        }
        self.locked_target = Some(id);
        log::info!(
            "Lock-on: target {} (priority {}) at {:.1} units",
            id,
            rank,
            distance
        );
        if self.state != BehaviorState::TargetLockOn {
            self.enter(BehaviorState::TargetLockOn, now_ms);
        }
    }

    fn explore(
        &mut self,
        scan: &ScanResult,
        world: &mut WorldModel,
        planner: &mut MissionPlanner,
        pose: &Pose,
        mode: VehicleMode,
        stuck: bool,
        now_ms: u64,
    ) -> BehaviorDecision {
        if stuck {
            return self.start_emergency(scan, pose, now_ms);
        }

        // Sustained "no clear path" escalates to a rotation scan.
        if scan.no_clear_path {
            let since = *self.no_path_since_ms.get_or_insert(now_ms);
            if now_ms.saturating_sub(since) >= self.config.no_path_debounce_ms {
                self.no_path_since_ms = None;
                self.rotation_accum = 0.0;
                self.rotation_target = normalize_angle(pose.heading + self.config.rotation_step);
                self.enter(BehaviorState::RotationScan, now_ms);
                return BehaviorDecision {
                    heading: self.rotation_target,
                    speed: 0.0,
                    force_scan: true,
                };
            }
        } else {
            self.no_path_since_ms = None;
        }

        // Advance the mission plan when the current waypoint is reached.
        if let Some(wp) = planner.current_waypoint()
            && pose.distance_to(&wp.position) < planner.waypoint_tolerance()
        {
            planner.advance(world);
        }
        let goal = planner
            .current_waypoint()
            .map(|wp| pose.heading_to(&wp.position));

        let heading = self.smart_heading(scan, pose, goal, mode, now_ms);
        self.memory.visit(&pose.position(), heading, now_ms);
        BehaviorDecision {
            heading,
            speed: 1.0,
            force_scan: false,
        }
    }

    fn pursue(
        &mut self,
        scan: &ScanResult,
        world: &mut WorldModel,
        pose: &Pose,
        mode: VehicleMode,
        stuck: bool,
        now_ms: u64,
    ) -> BehaviorDecision {
        if stuck {
            // Abandon the pursuit; the target stays detected and can be
            // re-acquired after recovery.
            self.release_lock(world);
            return self.start_emergency(scan, pose, now_ms);
        }

        let Some(target) = self.locked_target.and_then(|id| world.target(id)) else {
            // Raced away this tick; resume exploring next update.
            self.enter(BehaviorState::Exploring, now_ms);
            return BehaviorDecision::hold(pose.heading);
        };

        let goal = Some(pose.heading_to(&target.position));
        let heading = self.smart_heading(scan, pose, goal, mode, now_ms);
        self.memory.visit(&pose.position(), heading, now_ms);
        BehaviorDecision {
            heading,
            speed: 1.0,
            force_scan: false,
        }
    }

    fn rotate_scan(
        &mut self,
        scan: &ScanResult,
        world: &mut WorldModel,
        planner: &mut MissionPlanner,
        pose: &Pose,
        mode: VehicleMode,
        stuck: bool,
        now_ms: u64,
    ) -> BehaviorDecision {
        if scan.has_clear() {
            log::info!(
                "Rotation scan found a clear direction after {:.2} rad",
                self.rotation_accum
            );
            self.rotation_accum = 0.0;
            self.enter(BehaviorState::Exploring, now_ms);
            return self.explore(scan, world, planner, pose, mode, stuck, now_ms);
        }

        // Current increment finished: take the next one, re-scan first.
        if angle_diff(pose.heading, self.rotation_target).abs() < ROTATION_REACHED_RAD {
            self.rotation_accum += self.config.rotation_step;
            if self.rotation_accum >= TAU {
                return self.start_emergency(scan, pose, now_ms);
            }
            self.rotation_target =
                normalize_angle(self.rotation_target + self.config.rotation_step);
            return BehaviorDecision {
                heading: self.rotation_target,
                speed: 0.0,
                force_scan: true,
            };
        }

        BehaviorDecision::hold(self.rotation_target)
    }

    fn emergency(
        &mut self,
        scan: &ScanResult,
        world: &mut WorldModel,
        planner: &mut MissionPlanner,
        pose: &Pose,
        mode: VehicleMode,
        stuck: bool,
        now_ms: u64,
    ) -> BehaviorDecision {
        let dwell = now_ms.saturating_sub(self.entered_state_ms);
        if dwell >= self.config.emergency_min_ms && !stuck {
            log::info!("Emergency maneuver cleared, displacement resumed");
            self.enter(BehaviorState::Exploring, now_ms);
            return self.explore(scan, world, planner, pose, mode, stuck, now_ms);
        }

        BehaviorDecision {
            heading: self.emergency_heading,
            speed: 1.0,
            force_scan: false,
        }
    }

    /// Enter the emergency maneuver, picking the best escape heading.
    fn start_emergency(
        &mut self,
        scan: &ScanResult,
        pose: &Pose,
        now_ms: u64,
    ) -> BehaviorDecision {
        self.emergency_heading = scan
            .best_emergency_exit()
            .map(|ray| ray.angle)
            .unwrap_or_else(|| normalize_angle(pose.heading + PI + EMERGENCY_TURN_BIAS_RAD));
        self.no_path_since_ms = None;
        self.rotation_accum = 0.0;
        self.enter(BehaviorState::EmergencyManeuver, now_ms);
        BehaviorDecision {
            heading: self.emergency_heading,
            speed: 1.0,
            force_scan: false,
        }
    }

    fn smart_heading(
        &self,
        scan: &ScanResult,
        pose: &Pose,
        goal_heading: Option<f32>,
        mode: VehicleMode,
        now_ms: u64,
    ) -> f32 {
        let ctx = DirectionContext {
            goal_heading,
            current_heading: pose.heading,
            position: pose.position(),
            mode,
            now_ms,
            weights: &self.config.weights,
            memory: &self.memory,
        };
        choose_heading(scan, &ctx)
    }

    fn release_lock(&mut self, world: &mut WorldModel) {
        if let Some(id) = self.locked_target.take()
            && let Some(target) = world.target_mut(id)
            && target.state == DetectionState::Locked
        {
            target.state = DetectionState::Detected;
        }
    }

    fn enter(&mut self, state: BehaviorState, now_ms: u64) {
        if state != self.state {
            log::info!("Behavior: {} -> {}", self.state.as_str(), state.as_str());
            self.state = state;
            self.entered_state_ms = now_ms;
        }
    }
}
