//! Mission planner: deterministic waypoint generation per search pattern.
//!
//! Grid and perimeter sweeps precompute their full waypoint sequence and
//! walk a cursor through it. Spiral and random patrol are generative:
//! only the live pattern state is kept and the current waypoint is derived
//! from it. All pattern-specific state lives in the [`PatternProgress`]
//! union so exactly one pattern's state exists at a time.
//!
//! Regeneration (pattern, mode, or arena change) rebuilds everything and
//! re-seeds the planner RNG, so regenerating twice in a row yields an
//! identical sequence.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::MissionConfig;
use crate::core::types::Point2D;
use crate::mission::{Waypoint, WaypointTag};
use crate::state::VehicleMode;
use crate::world::WorldModel;

/// Search pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchPattern {
    /// Boustrophedon row sweep over the interior.
    #[default]
    GridSweep,

    /// Concentric square layers from the walls inward.
    PerimeterSweep,

    /// Polar expansion from the arena center.
    SpiralSearch,

    /// Random interior points until the pattern changes.
    RandomPatrol,
}

impl SearchPattern {
    /// Display string for telemetry.
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchPattern::GridSweep => "GRID_SWEEP",
            SearchPattern::PerimeterSweep => "PERIMETER_SWEEP",
            SearchPattern::SpiralSearch => "SPIRAL_SEARCH",
            SearchPattern::RandomPatrol => "RANDOM_PATROL",
        }
    }
}

/// Live state of the active pattern. One variant at a time, keyed by the
/// pattern the planner last regenerated for.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternProgress {
    /// Cursor into the precomputed grid sequence.
    Grid { cursor: usize },

    /// Cursor into the precomputed perimeter sequence.
    Perimeter { cursor: usize },

    /// Polar spiral state; the current waypoint is derived from it.
    Spiral { angle: f32, radius: f32, growth: f32 },

    /// Current patrol sample and how many have been served.
    Random { current: Waypoint, steps: u32 },
}

/// The mission planner.
pub struct MissionPlanner {
    config: MissionConfig,
    pattern: SearchPattern,

    /// Precomputed sequence (grid/perimeter patterns only).
    waypoints: Vec<Waypoint>,

    progress: PatternProgress,
    complete: bool,

    /// Resolved seed, reused on every regeneration.
    seed: u64,
    rng: StdRng,
}

impl MissionPlanner {
    /// Create a planner. `seed` = 0 resolves to OS entropy once; the
    /// resolved value is then fixed for the planner's lifetime.
    ///
    /// The planner starts empty: call [`MissionPlanner::regenerate`] once
    /// the world is populated.
    pub fn new(config: MissionConfig, seed: u64) -> Self {
        let seed = if seed == 0 {
            StdRng::from_os_rng().random()
        } else {
            seed
        };
        Self {
            config,
            pattern: SearchPattern::default(),
            waypoints: Vec::new(),
            progress: PatternProgress::Grid { cursor: 0 },
            complete: true,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Active pattern.
    pub fn pattern(&self) -> SearchPattern {
        self.pattern
    }

    /// Live pattern state.
    pub fn progress(&self) -> &PatternProgress {
        &self.progress
    }

    /// Precomputed waypoint sequence (empty for generative patterns).
    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    /// Distance at which a waypoint counts as reached.
    pub fn waypoint_tolerance(&self) -> f32 {
        self.config.waypoint_tolerance
    }

    /// Whether the pattern has been exhausted. Random patrol never
    /// completes.
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Rebuild the plan for a pattern/mode/arena combination.
    ///
    /// Resets the cursor, clears served state, and re-seeds the RNG so the
    /// rebuilt sequence is identical for identical inputs.
    pub fn regenerate(&mut self, pattern: SearchPattern, mode: VehicleMode, world: &WorldModel) {
        self.pattern = pattern;
        self.rng = StdRng::seed_from_u64(self.seed);
        self.waypoints.clear();
        self.complete = false;

        match pattern {
            SearchPattern::GridSweep => {
                self.waypoints = self.generate_grid(mode, world);
                self.progress = PatternProgress::Grid { cursor: 0 };
                self.complete = self.waypoints.is_empty();
            }
            SearchPattern::PerimeterSweep => {
                self.waypoints = self.generate_perimeter(world);
                self.progress = PatternProgress::Perimeter { cursor: 0 };
                self.complete = self.waypoints.is_empty();
            }
            SearchPattern::SpiralSearch => {
                let growth = self.spiral_growth(mode);
                self.progress = PatternProgress::Spiral {
                    angle: 0.0,
                    radius: growth,
                    growth,
                };
                self.skip_blocked_spiral_points(world);
            }
            SearchPattern::RandomPatrol => {
                let current = self.sample_patrol(world);
                self.progress = PatternProgress::Random { current, steps: 0 };
            }
        }

        log::info!(
            "Mission plan regenerated: {} ({} waypoints)",
            pattern.as_str(),
            self.waypoints.len()
        );
    }

    /// The waypoint the vehicle should currently steer for.
    pub fn current_waypoint(&self) -> Option<Waypoint> {
        if self.complete {
            return None;
        }
        match &self.progress {
            PatternProgress::Grid { cursor } | PatternProgress::Perimeter { cursor } => {
                self.waypoints.get(*cursor).copied()
            }
            PatternProgress::Spiral { angle, radius, .. } => Some(Waypoint::new(
                Point2D::new(radius * angle.cos(), radius * angle.sin()),
                WaypointTag::Spiral,
            )),
            PatternProgress::Random { current, .. } => Some(*current),
        }
    }

    /// Advance past the current waypoint (it was reached).
    pub fn advance(&mut self, world: &WorldModel) {
        if self.complete {
            return;
        }
        match self.pattern {
            SearchPattern::GridSweep | SearchPattern::PerimeterSweep => {
                if let PatternProgress::Grid { cursor } | PatternProgress::Perimeter { cursor } =
                    &mut self.progress
                {
                    *cursor += 1;
                    if *cursor >= self.waypoints.len() {
                        self.complete = true;
                        log::info!("{} pattern complete", self.pattern.as_str());
                    }
                }
            }
            SearchPattern::SpiralSearch => {
                self.advance_spiral(world.arena().half_extent());
                self.skip_blocked_spiral_points(world);
            }
            SearchPattern::RandomPatrol => {
                let next = Self::sample_patrol_inner(&mut self.rng, &self.config, world);
                if let PatternProgress::Random { current, steps } = &mut self.progress {
                    *steps += 1;
                    *current = next;
                }
            }
        }
    }

    fn spiral_growth(&self, mode: VehicleMode) -> f32 {
        match mode {
            VehicleMode::RescuePriority => {
                self.config.spiral_growth * self.config.rescue_spiral_factor
            }
            _ => self.config.spiral_growth,
        }
    }

    fn advance_spiral(&mut self, half_extent: f32) {
        if let PatternProgress::Spiral {
            angle,
            radius,
            growth,
        } = &mut self.progress
        {
            *angle += self.config.spiral_angle_step;
            *growth *= self.config.spiral_accel;
            *radius += *growth;
            if *radius > half_extent {
                self.complete = true;
                log::info!("SPIRAL_SEARCH pattern complete at radius {:.1}", radius);
            }
        }
    }

    /// Spiral points landing inside an obstacle are unreachable; advance
    /// through them.
    fn skip_blocked_spiral_points(&mut self, world: &WorldModel) {
        while !self.complete {
            let Some(wp) = self.current_waypoint() else {
                break;
            };
            if !world.blocked(&wp.position, self.config.waypoint_clearance) {
                break;
            }
            self.advance_spiral(world.arena().half_extent());
        }
    }

    fn sample_patrol(&mut self, world: &WorldModel) -> Waypoint {
        Self::sample_patrol_inner(&mut self.rng, &self.config, world)
    }

    /// Sample a random interior point clear of obstacles, with a bounded
    /// retry budget. Falls back to the arena center.
    fn sample_patrol_inner(
        rng: &mut StdRng,
        config: &MissionConfig,
        world: &WorldModel,
    ) -> Waypoint {
        let usable = world.arena().usable_half_extent();
        for _ in 0..config.patrol_attempts {
            let candidate = Point2D::new(
                rng.random_range(-usable..usable),
                rng.random_range(-usable..usable),
            );
            if !world.blocked(&candidate, config.waypoint_clearance) {
                return Waypoint::new(candidate, WaypointTag::Patrol);
            }
        }
        log::warn!(
            "Patrol sampling exhausted {} attempts, falling back to center",
            config.patrol_attempts
        );
        Waypoint::new(Point2D::new(0.0, 0.0), WaypointTag::Patrol)
    }

    /// Boustrophedon grid over the usable interior. Cells inside an
    /// obstacle footprint are skipped.
    fn generate_grid(&self, mode: VehicleMode, world: &WorldModel) -> Vec<Waypoint> {
        let cell = match mode {
            VehicleMode::RescuePriority => self.config.grid_cell * self.config.rescue_cell_factor,
            _ => self.config.grid_cell,
        };
        let usable = world.arena().usable_half_extent();
        let count = (2.0 * usable / cell).floor() as u32 + 1;

        let mut waypoints = Vec::new();
        for row in 0..count {
            let z = -usable + row as f32 * cell;
            let mut row_points: Vec<Waypoint> = (0..count)
                .map(|col| {
                    Waypoint::new(
                        Point2D::new(-usable + col as f32 * cell, z),
                        WaypointTag::GridCell { row, col },
                    )
                })
                .filter(|wp| !world.blocked(&wp.position, self.config.waypoint_clearance))
                .collect();
            // Odd rows run right-to-left so row ends join up.
            if row % 2 == 1 {
                row_points.reverse();
            }
            waypoints.extend(row_points);
        }
        waypoints
    }

    /// Concentric square layers shrinking inward, each traced
    /// top → right → bottom → left without duplicate corners, ending at
    /// the arena center.
    fn generate_perimeter(&self, world: &WorldModel) -> Vec<Waypoint> {
        let step = self.config.perimeter_step;
        let mut waypoints = Vec::new();
        let mut half = world.arena().usable_half_extent();
        let mut layer = 0u32;

        while half > step {
            let count = (2.0 * half / step).floor() as u32;
            let tag = WaypointTag::PerimeterEdge { layer };
            let mut push = |point: Point2D| {
                if !world.blocked(&point, self.config.waypoint_clearance) {
                    waypoints.push(Waypoint::new(point, tag));
                }
            };
            for i in 0..count {
                push(Point2D::new(-half + i as f32 * step, half));
            }
            for i in 0..count {
                push(Point2D::new(half, half - i as f32 * step));
            }
            for i in 0..count {
                push(Point2D::new(half - i as f32 * step, -half));
            }
            for i in 0..count {
                push(Point2D::new(-half, -half + i as f32 * step));
            }
            half -= step;
            layer += 1;
        }

        waypoints.push(Waypoint::new(
            Point2D::new(0.0, 0.0),
            WaypointTag::PerimeterEdge { layer },
        ));
        waypoints
    }
}
