//! Configuration for the VarunaNav simulation core.
//!
//! Every tunable lives here, serde-ready with per-field defaults so the
//! host can embed the structs in whatever configuration format it loads.
//! File parsing itself stays on the host side.

use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::error::{NavError, Result};

/// Top-level simulation configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master random seed (0 = seed from OS entropy).
    ///
    /// Drives target respawn placement and random-patrol sampling. A
    /// non-zero seed makes two runs over the same layout identical.
    #[serde(default)]
    pub seed: u64,

    #[serde(default)]
    pub arena: ArenaConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
    #[serde(default)]
    pub mission: MissionConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

/// Arena geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Half-extent of the square arena (world units).
    #[serde(default = "default_half_extent")]
    pub half_extent: f32,

    /// Margin inside the walls that counts as unusable (world units).
    #[serde(default = "default_wall_margin")]
    pub wall_margin: f32,

    /// Fog-of-war cell size (world units per cell).
    #[serde(default = "default_fog_resolution")]
    pub fog_resolution: f32,
}

/// Sensor scanner parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Number of rays in the scan fan.
    #[serde(default = "default_ray_count")]
    pub ray_count: usize,

    /// Field of view covered by the fan (radians).
    #[serde(default = "default_fov")]
    pub fov: f32,

    /// Maximum ray range (world units).
    #[serde(default = "default_max_range")]
    pub max_range: f32,

    /// Ray marching step (world units).
    #[serde(default = "default_ray_step")]
    pub step: f32,

    /// Base target detection radius around a marching ray point.
    #[serde(default = "default_detection_range")]
    pub detection_range: f32,

    /// Detection-range multiplier in rescue-priority mode.
    #[serde(default = "default_rescue_range_factor")]
    pub rescue_range_factor: f32,

    /// Minimum interval between fresh scans (milliseconds).
    #[serde(default = "default_scan_interval_ms")]
    pub scan_interval_ms: u64,

    /// Advanced search: rays keep detecting targets beyond the first
    /// obstacle hit, while path classification still stops there.
    #[serde(default)]
    pub advanced_search: bool,

    /// Quality above which a ray is a "best path" candidate.
    #[serde(default = "default_best_path_quality")]
    pub best_path_quality: f32,

    /// Quality above which a ray is an "emergency exit" candidate.
    #[serde(default = "default_emergency_quality")]
    pub emergency_quality: f32,

    /// Consecutive fully-blocked scans before signalling "no path".
    #[serde(default = "default_no_path_scan_limit")]
    pub no_path_scan_limit: u32,

    /// Fog reveal radius around traversed ray points (world units).
    #[serde(default = "default_reveal_radius")]
    pub reveal_radius: f32,
}

/// Mission planner parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissionConfig {
    /// Grid sweep cell size (world units).
    #[serde(default = "default_grid_cell")]
    pub grid_cell: f32,

    /// Grid cell shrink factor in rescue-priority mode.
    #[serde(default = "default_rescue_cell_factor")]
    pub rescue_cell_factor: f32,

    /// Inward step between perimeter layers, and spacing of points along
    /// each layer edge (world units).
    #[serde(default = "default_perimeter_step")]
    pub perimeter_step: f32,

    /// Spiral angular advance per reached point (radians).
    #[serde(default = "default_spiral_angle_step")]
    pub spiral_angle_step: f32,

    /// Base spiral radius growth per advance (world units).
    #[serde(default = "default_spiral_growth")]
    pub spiral_growth: f32,

    /// Multiplicative growth acceleration per advance.
    #[serde(default = "default_spiral_accel")]
    pub spiral_accel: f32,

    /// Spiral growth multiplier in rescue-priority mode.
    #[serde(default = "default_rescue_spiral_factor")]
    pub rescue_spiral_factor: f32,

    /// Distance at which a waypoint counts as reached (world units).
    #[serde(default = "default_waypoint_tolerance")]
    pub waypoint_tolerance: f32,

    /// Retry budget when sampling a random-patrol point clear of obstacles.
    #[serde(default = "default_patrol_attempts")]
    pub patrol_attempts: u32,

    /// Clearance from obstacle footprints required of generated waypoints.
    #[serde(default = "default_waypoint_clearance")]
    pub waypoint_clearance: f32,
}

/// Behavior arbiter parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BehaviorConfig {
    /// Distance at which a target is collected (world units).
    #[serde(default = "default_collect_radius")]
    pub collect_radius: f32,

    /// How long "no clear path" must persist before rotation scan (ms).
    #[serde(default = "default_no_path_debounce_ms")]
    pub no_path_debounce_ms: u64,

    /// Rotation scan increment (radians).
    #[serde(default = "default_rotation_step")]
    pub rotation_step: f32,

    /// Sub-threshold displacement duration that counts as stuck (ms).
    #[serde(default = "default_stuck_timeout_ms")]
    pub stuck_timeout_ms: u64,

    /// Minimum dwell in emergency maneuver before exit checks (ms).
    #[serde(default = "default_emergency_min_ms")]
    pub emergency_min_ms: u64,

    /// Sector-visit memory decay horizon (ms). A sector visited this long
    /// ago is fully novel again.
    #[serde(default = "default_sector_decay_ms")]
    pub sector_decay_ms: u64,

    /// Coarse grid cell size for sector memory (world units).
    #[serde(default = "default_sector_cell")]
    pub sector_cell: f32,

    /// Number of angle buckets for sector memory.
    #[serde(default = "default_sector_angle_buckets")]
    pub sector_angle_buckets: u8,

    #[serde(default)]
    pub weights: DirectionWeights,
}

/// Weights for the "smart direction" scoring function.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DirectionWeights {
    /// Alignment with the goal direction (dominant term).
    #[serde(default = "default_w_alignment")]
    pub alignment: f32,

    /// Clear-path quality and length.
    #[serde(default = "default_w_quality")]
    pub quality: f32,

    /// Bonus for heat-bearing rays.
    #[serde(default = "default_w_heat")]
    pub heat: f32,

    /// Bonus for survivor-bearing rays.
    #[serde(default = "default_w_survivor")]
    pub survivor: f32,

    /// Multiplier applied to heat/survivor bonuses in rescue-priority mode.
    #[serde(default = "default_w_rescue_signal_factor")]
    pub rescue_signal_factor: f32,

    /// Bonus for directions whose sector was not visited recently.
    #[serde(default = "default_w_novelty")]
    pub novelty: f32,

    /// Penalty for rays below the low-quality threshold.
    #[serde(default = "default_w_low_quality_penalty")]
    pub low_quality_penalty: f32,

    /// Quality below which the penalty applies.
    #[serde(default = "default_w_low_quality_threshold")]
    pub low_quality_threshold: f32,
}

/// Motion integrator parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionConfig {
    /// Base autonomous speed (world units per second).
    #[serde(default = "default_base_speed")]
    pub base_speed: f32,

    /// Speed multiplier in rescue-priority mode.
    #[serde(default = "default_rescue_speed_factor")]
    pub rescue_speed_factor: f32,

    /// Manual-mode translation speed (world units per second).
    #[serde(default = "default_manual_speed")]
    pub manual_speed: f32,

    /// Manual-mode turn rate (radians per second).
    #[serde(default = "default_turn_rate")]
    pub turn_rate: f32,

    /// Seconds of travel projected ahead when forming the motion target.
    #[serde(default = "default_lookahead_secs")]
    pub lookahead_secs: f32,

    /// Per-second exponential approach rate for position.
    #[serde(default = "default_position_smoothing")]
    pub position_smoothing: f32,

    /// Per-second exponential approach rate for heading.
    #[serde(default = "default_heading_smoothing")]
    pub heading_smoothing: f32,

    /// Smoothing-rate multiplier in rescue-priority mode.
    #[serde(default = "default_rescue_smoothing_factor")]
    pub rescue_smoothing_factor: f32,

    /// Inward offset applied when clamping to the arena boundary.
    #[serde(default = "default_boundary_inset")]
    pub boundary_inset: f32,

    /// Clearance kept from obstacle footprints (vehicle radius).
    #[serde(default = "default_obstacle_clearance")]
    pub obstacle_clearance: f32,

    /// Trailing window for stuck-detection displacement (ms).
    #[serde(default = "default_stuck_window_ms")]
    pub stuck_window_ms: u64,

    /// Net displacement below which the window counts as motionless.
    #[serde(default = "default_stuck_min_displacement")]
    pub stuck_min_displacement: f32,

    /// Minimum interval between fog reveals around the vehicle (ms).
    #[serde(default = "default_fog_reveal_interval_ms")]
    pub fog_reveal_interval_ms: u64,

    /// Fog reveal radius around the vehicle (world units).
    #[serde(default = "default_fog_reveal_radius")]
    pub fog_reveal_radius: f32,

    /// Depth band floor (most negative depth, world units).
    #[serde(default = "default_depth_min")]
    pub depth_min: f32,

    /// Depth band ceiling (surface).
    #[serde(default = "default_depth_max")]
    pub depth_max: f32,

    /// Dive/surface rate (world units per second).
    #[serde(default = "default_dive_rate")]
    pub dive_rate: f32,

    /// Battery drain per world unit travelled (percent).
    #[serde(default = "default_battery_drain_per_unit")]
    pub battery_drain_per_unit: f32,
}

impl SimConfig {
    /// Check the configuration for construction misuse.
    ///
    /// Returns the first violation found. Everything that passes here is
    /// policy the runtime handles without errors.
    pub fn validate(&self) -> Result<()> {
        if self.arena.half_extent <= 0.0 {
            return Err(NavError::Config("arena half_extent must be positive".into()));
        }
        if self.arena.wall_margin < 0.0 || self.arena.wall_margin >= self.arena.half_extent {
            return Err(NavError::Config(
                "wall_margin must be in [0, half_extent)".into(),
            ));
        }
        if self.arena.fog_resolution <= 0.0 {
            return Err(NavError::Config("fog_resolution must be positive".into()));
        }
        if self.scanner.ray_count == 0 {
            return Err(NavError::Config("scanner needs at least one ray".into()));
        }
        if self.scanner.fov <= 0.0 || self.scanner.fov > 2.0 * PI {
            return Err(NavError::Config("scanner fov must be in (0, 2π]".into()));
        }
        if self.scanner.max_range <= 0.0 {
            return Err(NavError::Config("scanner max_range must be positive".into()));
        }
        if self.scanner.step <= 0.0 || self.scanner.step > self.scanner.max_range {
            return Err(NavError::Config(
                "scanner step must be in (0, max_range]".into(),
            ));
        }
        if self.scanner.best_path_quality >= self.scanner.emergency_quality {
            return Err(NavError::Config(
                "best_path_quality must be below emergency_quality".into(),
            ));
        }
        if self.mission.grid_cell <= 0.0
            || self.mission.perimeter_step <= 0.0
            || self.mission.spiral_angle_step <= 0.0
            || self.mission.spiral_growth <= 0.0
        {
            return Err(NavError::Config(
                "mission pattern steps must be positive".into(),
            ));
        }
        if self.mission.waypoint_tolerance <= 0.0 {
            return Err(NavError::Config(
                "waypoint_tolerance must be positive".into(),
            ));
        }
        if self.behavior.rotation_step <= 0.0 || self.behavior.rotation_step > PI {
            return Err(NavError::Config("rotation_step must be in (0, π]".into()));
        }
        if self.behavior.sector_angle_buckets == 0 || self.behavior.sector_cell <= 0.0 {
            return Err(NavError::Config("sector memory geometry invalid".into()));
        }
        if self.motion.base_speed <= 0.0 || self.motion.manual_speed <= 0.0 {
            return Err(NavError::Config("speeds must be positive".into()));
        }
        if self.motion.position_smoothing <= 0.0 || self.motion.heading_smoothing <= 0.0 {
            return Err(NavError::Config("smoothing rates must be positive".into()));
        }
        if self.motion.depth_min > self.motion.depth_max {
            return Err(NavError::Config("depth band inverted".into()));
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            half_extent: default_half_extent(),
            wall_margin: default_wall_margin(),
            fog_resolution: default_fog_resolution(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            ray_count: default_ray_count(),
            fov: default_fov(),
            max_range: default_max_range(),
            step: default_ray_step(),
            detection_range: default_detection_range(),
            rescue_range_factor: default_rescue_range_factor(),
            scan_interval_ms: default_scan_interval_ms(),
            advanced_search: false,
            best_path_quality: default_best_path_quality(),
            emergency_quality: default_emergency_quality(),
            no_path_scan_limit: default_no_path_scan_limit(),
            reveal_radius: default_reveal_radius(),
        }
    }
}

impl Default for MissionConfig {
    fn default() -> Self {
        Self {
            grid_cell: default_grid_cell(),
            rescue_cell_factor: default_rescue_cell_factor(),
            perimeter_step: default_perimeter_step(),
            spiral_angle_step: default_spiral_angle_step(),
            spiral_growth: default_spiral_growth(),
            spiral_accel: default_spiral_accel(),
            rescue_spiral_factor: default_rescue_spiral_factor(),
            waypoint_tolerance: default_waypoint_tolerance(),
            patrol_attempts: default_patrol_attempts(),
            waypoint_clearance: default_waypoint_clearance(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            collect_radius: default_collect_radius(),
            no_path_debounce_ms: default_no_path_debounce_ms(),
            rotation_step: default_rotation_step(),
            stuck_timeout_ms: default_stuck_timeout_ms(),
            emergency_min_ms: default_emergency_min_ms(),
            sector_decay_ms: default_sector_decay_ms(),
            sector_cell: default_sector_cell(),
            sector_angle_buckets: default_sector_angle_buckets(),
            weights: DirectionWeights::default(),
        }
    }
}

impl Default for DirectionWeights {
    fn default() -> Self {
        Self {
            alignment: default_w_alignment(),
            quality: default_w_quality(),
            heat: default_w_heat(),
            survivor: default_w_survivor(),
            rescue_signal_factor: default_w_rescue_signal_factor(),
            novelty: default_w_novelty(),
            low_quality_penalty: default_w_low_quality_penalty(),
            low_quality_threshold: default_w_low_quality_threshold(),
        }
    }
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            base_speed: default_base_speed(),
            rescue_speed_factor: default_rescue_speed_factor(),
            manual_speed: default_manual_speed(),
            turn_rate: default_turn_rate(),
            lookahead_secs: default_lookahead_secs(),
            position_smoothing: default_position_smoothing(),
            heading_smoothing: default_heading_smoothing(),
            rescue_smoothing_factor: default_rescue_smoothing_factor(),
            boundary_inset: default_boundary_inset(),
            obstacle_clearance: default_obstacle_clearance(),
            stuck_window_ms: default_stuck_window_ms(),
            stuck_min_displacement: default_stuck_min_displacement(),
            fog_reveal_interval_ms: default_fog_reveal_interval_ms(),
            fog_reveal_radius: default_fog_reveal_radius(),
            depth_min: default_depth_min(),
            depth_max: default_depth_max(),
            dive_rate: default_dive_rate(),
            battery_drain_per_unit: default_battery_drain_per_unit(),
        }
    }
}

// Arena defaults
fn default_half_extent() -> f32 {
    20.0
}
fn default_wall_margin() -> f32 {
    1.0
}
fn default_fog_resolution() -> f32 {
    1.0
}

// Scanner defaults
fn default_ray_count() -> usize {
    24
}
fn default_fov() -> f32 {
    2.0 * PI / 3.0
} // 120° fan
fn default_max_range() -> f32 {
    12.0
}
fn default_ray_step() -> f32 {
    0.25
}
fn default_detection_range() -> f32 {
    2.0
}
fn default_rescue_range_factor() -> f32 {
    1.5
}
fn default_scan_interval_ms() -> u64 {
    30
}
fn default_best_path_quality() -> f32 {
    0.6
}
fn default_emergency_quality() -> f32 {
    0.8
}
fn default_no_path_scan_limit() -> u32 {
    15
}
fn default_reveal_radius() -> f32 {
    1.2
}

// Mission defaults
fn default_grid_cell() -> f32 {
    4.0
}
fn default_rescue_cell_factor() -> f32 {
    0.75
}
fn default_perimeter_step() -> f32 {
    3.0
}
fn default_spiral_angle_step() -> f32 {
    0.5
}
fn default_spiral_growth() -> f32 {
    0.35
}
fn default_spiral_accel() -> f32 {
    1.02
}
fn default_rescue_spiral_factor() -> f32 {
    1.5
}
fn default_waypoint_tolerance() -> f32 {
    1.2
}
fn default_patrol_attempts() -> u32 {
    16
}
fn default_waypoint_clearance() -> f32 {
    0.5
}

// Behavior defaults
fn default_collect_radius() -> f32 {
    1.0
}
fn default_no_path_debounce_ms() -> u64 {
    600
}
fn default_rotation_step() -> f32 {
    PI / 6.0
}
fn default_stuck_timeout_ms() -> u64 {
    2500
}
fn default_emergency_min_ms() -> u64 {
    800
}
fn default_sector_decay_ms() -> u64 {
    8000
}
fn default_sector_cell() -> f32 {
    5.0
}
fn default_sector_angle_buckets() -> u8 {
    8
}

// Direction weight defaults
fn default_w_alignment() -> f32 {
    3.0
}
fn default_w_quality() -> f32 {
    1.5
}
fn default_w_heat() -> f32 {
    0.8
}
fn default_w_survivor() -> f32 {
    1.5
}
fn default_w_rescue_signal_factor() -> f32 {
    4.0
}
fn default_w_novelty() -> f32 {
    1.0
}
fn default_w_low_quality_penalty() -> f32 {
    1.2
}
fn default_w_low_quality_threshold() -> f32 {
    0.3
}

// Motion defaults
fn default_base_speed() -> f32 {
    3.0
}
fn default_rescue_speed_factor() -> f32 {
    1.4
}
fn default_manual_speed() -> f32 {
    2.5
}
fn default_turn_rate() -> f32 {
    1.8
}
fn default_lookahead_secs() -> f32 {
    0.6
}
fn default_position_smoothing() -> f32 {
    3.0
}
fn default_heading_smoothing() -> f32 {
    4.5
}
fn default_rescue_smoothing_factor() -> f32 {
    1.5
}
fn default_boundary_inset() -> f32 {
    0.8
}
fn default_obstacle_clearance() -> f32 {
    0.6
}
fn default_stuck_window_ms() -> u64 {
    1200
}
fn default_stuck_min_displacement() -> f32 {
    0.35
}
fn default_fog_reveal_interval_ms() -> u64 {
    100
}
fn default_fog_reveal_radius() -> f32 {
    2.0
}
fn default_depth_min() -> f32 {
    -8.0
}
fn default_depth_max() -> f32 {
    0.0
}
fn default_dive_rate() -> f32 {
    1.5
}
fn default_battery_drain_per_unit() -> f32 {
    0.05
}
