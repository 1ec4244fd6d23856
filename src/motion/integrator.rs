//! Motion integrator.
//!
//! Turns the arbiter's chosen direction into smoothed motion: forms a
//! lookahead target, rejects targets inside obstacles, collapses
//! out-of-bounds targets onto the boundary, and exponentially approaches
//! the result. In manual mode the control intent is honored verbatim and
//! the arbiter is bypassed entirely.
//!
//! The integrator also owns the displacement window behind stuck
//! detection and the opportunistic collection sweep.

use std::collections::VecDeque;

use crate::behavior::BehaviorDecision;
use crate::config::MotionConfig;
use crate::core::math::{angle_lerp, smoothing_alpha};
use crate::core::types::Point2D;
use crate::state::{ControlIntent, VehicleMode, VehicleState};
use crate::world::{FogMap, HeatTarget, WorldModel};

/// Trailing window of recent positions for stuck detection.
///
/// Keeps (timestamp, position) samples inside the window and reports how
/// long net displacement has stayed below the motionless threshold.
#[derive(Debug, Clone)]
pub struct DisplacementTracker {
    window_ms: u64,
    min_displacement: f32,
    samples: VecDeque<(u64, Point2D)>,

    /// When sub-threshold displacement was first observed.
    stalled_since_ms: Option<u64>,
}

impl DisplacementTracker {
    /// Create a tracker.
    pub fn new(window_ms: u64, min_displacement: f32) -> Self {
        Self {
            window_ms,
            min_displacement,
            samples: VecDeque::new(),
            stalled_since_ms: None,
        }
    }

    /// Record the position for this tick and update the stall clock.
    pub fn update(&mut self, position: Point2D, now_ms: u64) {
        self.samples.push_back((now_ms, position));
        while let Some(&(t, _)) = self.samples.front()
            && now_ms.saturating_sub(t) > self.window_ms
        {
            self.samples.pop_front();
        }

        // Net displacement across the window, not path length: a vehicle
        // jittering in place must still read as motionless.
        let displacement = match (self.samples.front(), self.samples.back()) {
            (Some(&(_, first)), Some(&(_, last))) => first.distance(&last),
            _ => 0.0,
        };

        let window_full = self
            .samples
            .front()
            .is_some_and(|&(t, _)| now_ms.saturating_sub(t) >= self.window_ms.saturating_sub(1));
        if displacement < self.min_displacement && window_full {
            self.stalled_since_ms.get_or_insert(now_ms);
        } else if displacement >= self.min_displacement {
            self.stalled_since_ms = None;
        }
    }

    /// How long displacement has been below threshold (ms).
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        self.stalled_since_ms
            .map(|since| now_ms.saturating_sub(since))
            .unwrap_or(0)
    }

    /// Drop all samples and the stall clock.
    pub fn reset(&mut self) {
        self.samples.clear();
        self.stalled_since_ms = None;
    }
}

/// The motion integrator.
pub struct MotionIntegrator {
    config: MotionConfig,
    tracker: DisplacementTracker,
    last_fog_reveal_ms: Option<u64>,

    /// Distance travelled since the last telemetry drain.
    distance_accum: f32,
}

impl MotionIntegrator {
    /// Create an integrator.
    pub fn new(config: MotionConfig) -> Self {
        let tracker = DisplacementTracker::new(config.stuck_window_ms, config.stuck_min_displacement);
        Self {
            config,
            tracker,
            last_fog_reveal_ms: None,
            distance_accum: 0.0,
        }
    }

    /// Motion configuration.
    pub fn config(&self) -> &MotionConfig {
        &self.config
    }

    /// How long the vehicle has been effectively motionless (ms).
    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        self.tracker.stalled_for(now_ms)
    }

    /// Distance travelled since the last call, for battery telemetry.
    pub fn take_distance(&mut self) -> f32 {
        std::mem::take(&mut self.distance_accum)
    }

    /// Clear the displacement window and fog timer (mode switches, resets).
    pub fn reset(&mut self) {
        self.tracker.reset();
        self.last_fog_reveal_ms = None;
        self.distance_accum = 0.0;
    }

    /// Apply one autonomous tick from the arbiter's decision.
    pub fn apply_decision(
        &mut self,
        vehicle: &mut VehicleState,
        decision: &BehaviorDecision,
        world: &WorldModel,
        fog: &mut FogMap,
        now_ms: u64,
        dt_ms: u64,
    ) {
        let cfg = &self.config;
        let dt = dt_ms as f32 / 1000.0;
        let rescue = vehicle.mode == VehicleMode::RescuePriority;
        let smoothing_boost = if rescue { cfg.rescue_smoothing_factor } else { 1.0 };

        // Heading first: shortest-arc exponential approach.
        let beta = smoothing_alpha(cfg.heading_smoothing * smoothing_boost, dt);
        vehicle.pose.heading = angle_lerp(vehicle.pose.heading, decision.heading, beta);

        // Lookahead target along the chosen direction.
        let speed_factor = if rescue { cfg.rescue_speed_factor } else { 1.0 };
        let speed = decision.speed * cfg.base_speed * speed_factor * vehicle.speed_multiplier;
        let position = vehicle.pose.position();
        let mut target = position.offset(decision.heading, speed * cfg.lookahead_secs);

        // A target inside an obstacle is rejected outright: no motion this
        // tick. Out-of-bounds targets collapse to the boundary instead.
        if world.blocked(&target, cfg.obstacle_clearance) {
            target = position;
        } else if !world.arena().contains_usable(&target) {
            target = world.arena().clamp_inside(&target, cfg.boundary_inset);
        }

        let alpha = smoothing_alpha(cfg.position_smoothing * smoothing_boost, dt);
        let stepped = Point2D::new(
            position.x + (target.x - position.x) * alpha,
            position.z + (target.z - position.z) * alpha,
        );
        self.settle(vehicle, position, stepped, world, fog, now_ms);
    }

    /// Apply one manual tick, honoring the control intent verbatim.
    pub fn apply_manual(
        &mut self,
        vehicle: &mut VehicleState,
        controls: &ControlIntent,
        world: &WorldModel,
        fog: &mut FogMap,
        now_ms: u64,
        dt_ms: u64,
    ) {
        let cfg = &self.config;
        let dt = dt_ms as f32 / 1000.0;

        vehicle.pose.heading = crate::core::math::normalize_angle(
            vehicle.pose.heading + controls.turn() * cfg.turn_rate * dt,
        );

        let position = vehicle.pose.position();
        let step = controls.translation() * cfg.manual_speed * vehicle.speed_multiplier * dt;
        let mut target = position.offset(vehicle.pose.heading, step);
        if world.blocked(&target, cfg.obstacle_clearance) {
            target = position;
        } else if !world.arena().contains_usable(&target) {
            target = world.arena().clamp_inside(&target, cfg.boundary_inset);
        }

        vehicle.depth = (vehicle.depth + controls.vertical() * cfg.dive_rate * dt)
            .clamp(cfg.depth_min, cfg.depth_max);

        self.settle(vehicle, position, target, world, fog, now_ms);
    }

    /// Collect every active target within the collection radius.
    ///
    /// Runs every tick regardless of behavior state, so collection happens
    /// opportunistically during exploration too. The caller respawns
    /// replacements.
    pub fn collect_targets(
        &mut self,
        world: &mut WorldModel,
        vehicle: &VehicleState,
        collect_radius: f32,
    ) -> Vec<HeatTarget> {
        let position = vehicle.pose.position();
        let due: Vec<u32> = world
            .active_targets()
            .filter(|t| t.position.distance(&position) < collect_radius)
            .map(|t| t.id)
            .collect();
        due.into_iter()
            .filter_map(|id| world.collect_target(id))
            .collect()
    }

    /// Commit a validated position, then run the shared per-tick upkeep:
    /// displacement window, travel accumulation, fog reveal.
    fn settle(
        &mut self,
        vehicle: &mut VehicleState,
        previous: Point2D,
        next: Point2D,
        world: &WorldModel,
        fog: &mut FogMap,
        now_ms: u64,
    ) {
        let cfg = &self.config;

        // Final guard: never settle inside an obstacle or off the arena.
        let clamped = world.arena().clamp_inside(&next, 0.0);
        let next = if world.blocked(&clamped, cfg.obstacle_clearance) {
            previous
        } else {
            clamped
        };

        vehicle.pose.x = next.x;
        vehicle.pose.z = next.z;

        self.distance_accum += previous.distance(&next);
        self.tracker.update(next, now_ms);

        let due = self
            .last_fog_reveal_ms
            .is_none_or(|last| now_ms.saturating_sub(last) >= cfg.fog_reveal_interval_ms);
        if due {
            fog.reveal_circle(&next, cfg.fog_reveal_radius);
            self.last_fog_reveal_ms = Some(now_ms);
        }
    }
}
