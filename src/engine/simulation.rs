//! Simulation orchestrator.
//!
//! [`Simulation`] owns every component and runs the per-tick data flow:
//! world -> scanner -> arbiter -> integrator -> collection -> telemetry.
//! Single-threaded and frame-driven; the host calls [`Simulation::tick`]
//! from its frame callback with the elapsed milliseconds. All timing
//! inside the core derives from that injected clock.

use crate::behavior::{BehaviorArbiter, BehaviorState};
use crate::config::SimConfig;
use crate::core::types::Point2D;
use crate::engine::MissionTelemetry;
use crate::error::Result;
use crate::mission::{MissionPlanner, SearchPattern, Waypoint};
use crate::motion::MotionIntegrator;
use crate::sensors::{ScanResult, SensorScanner};
use crate::state::{ControlIntent, VehicleMode, VehicleState};
use crate::world::{ArenaBounds, FogMap, HeatCategory, WorldModel};

/// The complete simulation core.
pub struct Simulation {
    config: SimConfig,
    world: WorldModel,
    fog: FogMap,
    scanner: SensorScanner,
    planner: MissionPlanner,
    arbiter: BehaviorArbiter,
    integrator: MotionIntegrator,
    vehicle: VehicleState,
    controls: ControlIntent,

    /// Requested search pattern (the planner follows on rebuild).
    pattern: SearchPattern,

    /// Monotonic simulation clock (ms).
    clock_ms: u64,

    targets_found: u32,
    battery_percent: f32,
    last_scan: ScanResult,

    /// The mission plan must be rebuilt before the next tick runs.
    plan_dirty: bool,
}

impl Simulation {
    /// Build a simulation from a validated configuration.
    ///
    /// The world starts empty; populate it with
    /// [`Simulation::add_obstacle`] and [`Simulation::place_target`] /
    /// [`Simulation::spawn_target`], then tick.
    pub fn new(config: SimConfig) -> Result<Self> {
        config.validate()?;

        let arena = ArenaBounds::new(config.arena.half_extent, config.arena.wall_margin);
        // Decorrelate the placement stream from the planner stream while
        // keeping seed 0 = entropy for both.
        let world_seed = if config.seed == 0 {
            0
        } else {
            config.seed.wrapping_add(1)
        };
        let world = WorldModel::new(arena, world_seed);
        let fog = FogMap::new(&arena, config.arena.fog_resolution);
        let scanner = SensorScanner::new(config.scanner.clone());
        let planner = MissionPlanner::new(config.mission.clone(), config.seed);
        let arbiter = BehaviorArbiter::new(config.behavior.clone());
        let integrator = MotionIntegrator::new(config.motion.clone());

        Ok(Self {
            config,
            world,
            fog,
            scanner,
            planner,
            arbiter,
            integrator,
            vehicle: VehicleState::default(),
            controls: ControlIntent::default(),
            pattern: SearchPattern::default(),
            clock_ms: 0,
            targets_found: 0,
            battery_percent: 100.0,
            last_scan: ScanResult::default(),
            plan_dirty: true,
        })
    }

    // ========================================================================
    // Host-facing world setup
    // ========================================================================

    /// Add a static obstacle; the mission plan rebuilds before the next
    /// tick so sweep cells inside the footprint are skipped.
    pub fn add_obstacle(&mut self, x: f32, z: f32, radius: f32) -> Result<u32> {
        let id = self.world.add_obstacle(Point2D::new(x, z), radius)?;
        self.plan_dirty = true;
        Ok(id)
    }

    /// Place a target at an explicit position.
    pub fn place_target(&mut self, x: f32, z: f32, category: HeatCategory) -> Result<u32> {
        self.world.place_target(Point2D::new(x, z), category)
    }

    /// Spawn a target at a random clear interior point.
    pub fn spawn_target(&mut self, category: HeatCategory) -> Option<u32> {
        self.world.spawn_target(category)
    }

    /// Remove a target externally (despawn without collection).
    pub fn remove_target(&mut self, id: u32) {
        self.world.remove_target(id);
    }

    /// Teleport the vehicle (host placement).
    pub fn set_vehicle_position(&mut self, x: f32, z: f32) {
        self.vehicle.pose.x = x;
        self.vehicle.pose.z = z;
    }

    /// Host-adjustable speed scale applied on top of mode speeds.
    pub fn set_speed_multiplier(&mut self, multiplier: f32) {
        self.vehicle.speed_multiplier = multiplier.max(0.0);
    }

    // ========================================================================
    // Mode and pattern control
    // ========================================================================

    /// Switch operating mode. Rebuilds the plan (pattern geometry is
    /// mode-dependent) and clears component timers.
    pub fn set_mode(&mut self, mode: VehicleMode) {
        if self.vehicle.mode == mode {
            return;
        }
        log::info!("Mode: {} -> {}", self.vehicle.mode.as_str(), mode.as_str());
        self.vehicle.mode = mode;
        self.controls.clear();
        self.plan_dirty = true;
    }

    /// Switch search pattern. Rebuilds the plan and clears component
    /// timers.
    pub fn set_pattern(&mut self, pattern: SearchPattern) {
        if self.pattern == pattern {
            return;
        }
        log::info!(
            "Pattern: {} -> {}",
            self.pattern.as_str(),
            pattern.as_str()
        );
        self.pattern = pattern;
        self.plan_dirty = true;
    }

    /// Full arena reset: obstacles, targets, fog, counters, vehicle.
    pub fn reset(&mut self) {
        log::info!("Arena reset");
        self.world.clear();
        self.fog.reset();
        self.vehicle = VehicleState::default();
        self.controls.clear();
        self.clock_ms = 0;
        self.targets_found = 0;
        self.battery_percent = 100.0;
        self.last_scan = ScanResult::default();
        self.plan_dirty = true;
    }

    // ========================================================================
    // Per-tick execution
    // ========================================================================

    /// Advance the simulation by `dt_ms` milliseconds.
    pub fn tick(&mut self, dt_ms: u64) {
        self.clock_ms += dt_ms;
        let now = self.clock_ms;

        // Pending plan/mode/pattern changes apply atomically before any
        // component runs, so no stale state survives into this tick.
        if self.plan_dirty {
            self.rebuild_plan(now);
        }

        let scan = self.scanner.scan(
            &mut self.world,
            &mut self.fog,
            &self.vehicle.pose,
            self.vehicle.mode,
            now,
        );

        if self.vehicle.mode == VehicleMode::Manual {
            // Arbitration is bypassed; the update call only keeps the
            // state machine parked in Manual.
            let range = self.scanner.effective_detection_range(self.vehicle.mode);
            self.arbiter.update(
                &scan,
                &mut self.world,
                &mut self.planner,
                &self.vehicle,
                false,
                range,
                now,
            );
            self.integrator.apply_manual(
                &mut self.vehicle,
                &self.controls,
                &self.world,
                &mut self.fog,
                now,
                dt_ms,
            );
        } else {
            let stuck =
                self.integrator.stalled_for(now) >= self.config.behavior.stuck_timeout_ms;
            let range = self.scanner.effective_detection_range(self.vehicle.mode);
            let decision = self.arbiter.update(
                &scan,
                &mut self.world,
                &mut self.planner,
                &self.vehicle,
                stuck,
                range,
                now,
            );
            if decision.force_scan {
                self.scanner.invalidate();
            }
            self.integrator.apply_decision(
                &mut self.vehicle,
                &decision,
                &self.world,
                &mut self.fog,
                now,
                dt_ms,
            );
        }

        // Opportunistic collection, independent of behavior state; every
        // collected target spawns exactly one replacement.
        let collected = self.integrator.collect_targets(
            &mut self.world,
            &self.vehicle,
            self.config.behavior.collect_radius,
        );
        for target in collected {
            self.targets_found += 1;
            if self.world.spawn_target(target.category).is_none() {
                log::warn!(
                    "No room to respawn a {} target",
                    target.category.as_str()
                );
            }
        }

        let drain_factor = match self.vehicle.mode {
            VehicleMode::RescuePriority => self.config.motion.rescue_speed_factor,
            _ => 1.0,
        };
        let travelled = self.integrator.take_distance();
        self.battery_percent = (self.battery_percent
            - travelled * self.config.motion.battery_drain_per_unit * drain_factor)
            .max(0.0);

        self.last_scan = scan;
    }

    fn rebuild_plan(&mut self, now_ms: u64) {
        self.planner
            .regenerate(self.pattern, self.vehicle.mode, &self.world);
        self.arbiter.reset(&mut self.world, now_ms);
        self.scanner.reset();
        self.integrator.reset();
        self.plan_dirty = false;
    }

    // ========================================================================
    // Host-facing reads
    // ========================================================================

    /// Manual control intent (host input layer writes here).
    pub fn controls_mut(&mut self) -> &mut ControlIntent {
        &mut self.controls
    }

    /// Vehicle state.
    pub fn vehicle(&self) -> &VehicleState {
        &self.vehicle
    }

    /// World model.
    pub fn world(&self) -> &WorldModel {
        &self.world
    }

    /// Fog-of-war map.
    pub fn fog(&self) -> &FogMap {
        &self.fog
    }

    /// Last classified scan (for sensor visualization).
    pub fn last_scan(&self) -> &ScanResult {
        &self.last_scan
    }

    /// Active search pattern.
    pub fn pattern(&self) -> SearchPattern {
        self.pattern
    }

    /// Current operating mode.
    pub fn mode(&self) -> VehicleMode {
        self.vehicle.mode
    }

    /// Current behavior state.
    pub fn behavior_state(&self) -> BehaviorState {
        self.arbiter.state()
    }

    /// The waypoint currently steered for, if any.
    pub fn current_waypoint(&self) -> Option<Waypoint> {
        self.planner.current_waypoint()
    }

    /// Targets collected so far.
    pub fn targets_found(&self) -> u32 {
        self.targets_found
    }

    /// Simulation clock (ms).
    pub fn clock_ms(&self) -> u64 {
        self.clock_ms
    }

    /// Assemble the UI telemetry snapshot.
    pub fn telemetry(&self) -> MissionTelemetry {
        MissionTelemetry {
            mode: self.vehicle.mode,
            pattern: self.pattern,
            behavior: self.arbiter.state(),
            status: self.status_line(),
            targets_found: self.targets_found,
            searched_percent: self.fog.searched_percent(),
            detected_heat: self.world.detected_categories(),
            pose: self.vehicle.pose,
            depth: self.vehicle.depth,
            battery_percent: self.battery_percent,
            pattern_complete: self.planner.is_complete(),
        }
    }

    fn status_line(&self) -> String {
        match self.arbiter.state() {
            BehaviorState::Manual => "Manual control".to_string(),
            BehaviorState::TargetLockOn => {
                let category = self
                    .arbiter
                    .locked_target()
                    .and_then(|id| self.world.target(id))
                    .map(|t| t.category.as_str())
                    .unwrap_or("UNKNOWN");
                format!("Lock-on: approaching {} target", category)
            }
            BehaviorState::RotationScan => "Rotation scan: searching for clear path".to_string(),
            BehaviorState::EmergencyManeuver => "Emergency maneuver: breaking free".to_string(),
            BehaviorState::Exploring => {
                if self.planner.is_complete() {
                    format!(
                        "{} complete: {} targets found",
                        self.pattern.as_str(),
                        self.targets_found
                    )
                } else {
                    format!(
                        "Searching ({}): {:.0}% covered",
                        self.pattern.as_str(),
                        self.fog.searched_percent()
                    )
                }
            }
        }
    }
}
