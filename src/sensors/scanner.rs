//! Rate-limited sensor scanner.
//!
//! Casts a fan of range/thermal rays against the world model, classifies
//! the returns, marks swept targets detected, and reveals fog along the
//! traversed segments. Re-scans only when the minimum interval has
//! elapsed; calls inside the window return the cached result.

use crate::config::ScannerConfig;
use crate::core::types::{Point2D, Pose};
use crate::sensors::{RayClass, RaySample, ScanResult};
use crate::state::VehicleMode;
use crate::world::{DetectionState, FogMap, HeatCategory, WorldModel};

/// The sensor scanner.
pub struct SensorScanner {
    config: ScannerConfig,

    /// Clock value of the last fresh scan.
    last_scan_ms: Option<u64>,

    /// Result of the last fresh scan.
    cached: Option<ScanResult>,

    /// Consecutive fresh scans with zero clear rays.
    blocked_scans: u32,
}

impl SensorScanner {
    /// Create a scanner with the given configuration.
    pub fn new(config: ScannerConfig) -> Self {
        Self {
            config,
            last_scan_ms: None,
            cached: None,
            blocked_scans: 0,
        }
    }

    /// Scanner configuration.
    pub fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Target detection range for the given mode.
    ///
    /// One scaling rule everywhere: rescue-priority mode widens the base
    /// range by `rescue_range_factor`, all other modes use it as-is.
    pub fn effective_detection_range(&self, mode: VehicleMode) -> f32 {
        match mode {
            VehicleMode::RescuePriority => {
                self.config.detection_range * self.config.rescue_range_factor
            }
            _ => self.config.detection_range,
        }
    }

    /// Drop the cached result so the next call re-scans immediately.
    ///
    /// Used by the rotation-scan behavior to force a fresh look after each
    /// turn increment, and on mode/pattern switches.
    pub fn invalidate(&mut self) {
        self.last_scan_ms = None;
        self.cached = None;
    }

    /// Full reset: cache and blocked-scan counter.
    pub fn reset(&mut self) {
        self.invalidate();
        self.blocked_scans = 0;
    }

    /// Scan from the given pose, or return the cached result when called
    /// inside the minimum scan interval.
    ///
    /// Side effects of a fresh scan: targets swept by a ray are marked
    /// detected, and fog cells along traversed segments (plus the
    /// vehicle's own cell) are revealed.
    pub fn scan(
        &mut self,
        world: &mut WorldModel,
        fog: &mut FogMap,
        pose: &Pose,
        mode: VehicleMode,
        now_ms: u64,
    ) -> ScanResult {
        if let Some(last) = self.last_scan_ms
            && now_ms.saturating_sub(last) < self.config.scan_interval_ms
            && let Some(cached) = &self.cached
        {
            return cached.clone();
        }

        let result = self.cast_fan(world, fog, pose, mode, now_ms);
        self.last_scan_ms = Some(now_ms);
        self.cached = Some(result.clone());
        result
    }

    fn cast_fan(
        &mut self,
        world: &mut WorldModel,
        fog: &mut FogMap,
        pose: &Pose,
        mode: VehicleMode,
        now_ms: u64,
    ) -> ScanResult {
        let cfg = &self.config;
        let origin = pose.position();
        let detection_range = self.effective_detection_range(mode);
        let steps = (cfg.max_range / cfg.step).floor().max(1.0) as usize;

        fog.reveal_circle(&origin, cfg.reveal_radius);

        let mut rays = Vec::with_capacity(cfg.ray_count);
        for i in 0..cfg.ray_count {
            let angle = if cfg.ray_count == 1 {
                pose.heading
            } else {
                pose.heading - cfg.fov / 2.0
                    + cfg.fov * i as f32 / (cfg.ray_count - 1) as f32
            };
            rays.push(self.cast_ray(world, fog, &origin, angle, detection_range, steps));
        }

        let mut result = ScanResult {
            rays,
            timestamp_ms: now_ms,
            ..Default::default()
        };
        self.classify(&mut result);
        result
    }

    /// March one ray outward in fixed steps.
    ///
    /// The first obstacle or wall hit truncates the clear run. In advanced
    /// search the ray keeps sweeping for targets beyond an obstacle (but
    /// never through the wall), while the clear run stays truncated.
    fn cast_ray(
        &self,
        world: &mut WorldModel,
        fog: &mut FogMap,
        origin: &Point2D,
        angle: f32,
        detection_range: f32,
        steps: usize,
    ) -> RaySample {
        let cfg = &self.config;
        let mut sample = RaySample {
            angle,
            clear_distance: 0.0,
            class: RayClass::Clear,
            quality: 0.0,
            carries_heat: false,
            carries_survivor: false,
            target_id: None,
            target_distance: 0.0,
        };

        for k in 1..=steps {
            let t = k as f32 * cfg.step;
            let point = origin.offset(angle, t);

            if sample.class == RayClass::Clear {
                if !world.arena().contains(&point) {
                    sample.class = RayClass::Wall;
                    break;
                }
                if world.blocked(&point, 0.0) {
                    sample.class = RayClass::Obstacle;
                    if !cfg.advanced_search {
                        break;
                    }
                    // Advanced search keeps sweeping for heat beyond the
                    // hit; the clear run stays truncated.
                    continue;
                }
                sample.clear_distance = t;
                fog.reveal_circle(&point, cfg.reveal_radius);
            } else if !world.arena().contains(&point) {
                // Advanced search never sees through the wall.
                break;
            }

            if sample.target_id.is_none() {
                self.detect_target(world, origin, &point, detection_range, &mut sample);
            }
        }

        sample.quality = (sample.clear_distance / cfg.max_range).clamp(0.0, 1.0);
        sample
    }

    /// Record the first active target within detection range of a marching
    /// ray point, and mark it detected.
    fn detect_target(
        &self,
        world: &mut WorldModel,
        origin: &Point2D,
        point: &Point2D,
        detection_range: f32,
        sample: &mut RaySample,
    ) {
        let mut hit: Option<(u32, HeatCategory, f32)> = None;
        let mut best_point_distance = f32::MAX;
        for target in world.active_targets() {
            let to_point = target.position.distance(point);
            if to_point > detection_range || to_point >= best_point_distance {
                continue;
            }
            best_point_distance = to_point;
            hit = Some((target.id, target.category, target.position.distance(origin)));
        }

        if let Some((id, category, distance)) = hit {
            sample.carries_heat = true;
            sample.carries_survivor = category == HeatCategory::Survivor;
            sample.target_id = Some(id);
            sample.target_distance = distance;

            if let Some(target) = world.target_mut(id)
                && target.state == DetectionState::Undetected
            {
                target.state = DetectionState::Detected;
                log::debug!(
                    "Detected {} target {} at range {:.1}",
                    category.as_str(),
                    id,
                    distance
                );
            }
        }
    }

    /// Partition rays and update the no-path counter.
    fn classify(&mut self, result: &mut ScanResult) {
        let cfg = &self.config;
        for (i, ray) in result.rays.iter().enumerate() {
            if ray.class.is_blocked() {
                result.blocked.push(i);
            } else {
                result.clear.push(i);
            }
            if ray.quality > cfg.best_path_quality {
                result.best_paths.push(i);
            }
            if ray.quality > cfg.emergency_quality {
                result.emergency_exits.push(i);
            }
            if ray.carries_heat {
                result.heat_bearing.push(i);
            }
            if ray.carries_survivor {
                result.survivor_bearing.push(i);
            }
        }

        let by_target_distance = |rays: &[RaySample], a: &usize, b: &usize| {
            rays[*a].target_distance.total_cmp(&rays[*b].target_distance)
        };
        result
            .heat_bearing
            .sort_by(|a, b| by_target_distance(&result.rays, a, b));
        result
            .survivor_bearing
            .sort_by(|a, b| by_target_distance(&result.rays, a, b));

        if result.clear.is_empty() {
            self.blocked_scans += 1;
            if self.blocked_scans == cfg.no_path_scan_limit {
                log::warn!(
                    "No clear direction for {} consecutive scans",
                    self.blocked_scans
                );
            }
        } else {
            self.blocked_scans = 0;
        }
        result.no_clear_path = self.blocked_scans >= cfg.no_path_scan_limit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::ArenaBounds;

    fn make_world() -> (WorldModel, FogMap) {
        let arena = ArenaBounds::new(20.0, 1.0);
        let fog = FogMap::new(&arena, 1.0);
        (WorldModel::new(arena, 42), fog)
    }

    fn make_scanner() -> SensorScanner {
        SensorScanner::new(ScannerConfig::default())
    }

    #[test]
    fn test_open_water_rays_are_clear() {
        let (mut world, mut fog) = make_world();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);

        assert_eq!(scan.rays.len(), scanner.config().ray_count);
        assert_eq!(scan.clear.len(), scan.rays.len());
        assert!(scan.blocked.is_empty());
        for ray in &scan.rays {
            assert_eq!(ray.class, RayClass::Clear);
            assert!((ray.quality - 1.0).abs() < 0.05);
        }
    }

    #[test]
    fn test_partition_invariant() {
        let (mut world, mut fog) = make_world();
        world.add_obstacle(Point2D::new(4.0, 0.0), 2.0).unwrap();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);

        assert_eq!(scan.clear.len() + scan.blocked.len(), scan.rays.len());
        for ray in &scan.rays {
            assert!(ray.quality >= 0.0 && ray.quality <= 1.0);
        }
        assert!(!scan.blocked.is_empty());
    }

    #[test]
    fn test_obstacle_truncates_forward_ray() {
        let (mut world, mut fog) = make_world();
        world.add_obstacle(Point2D::new(4.0, 0.0), 1.0).unwrap();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);

        // The center ray points straight at the obstacle.
        let center = &scan.rays[scan.rays.len() / 2];
        assert_eq!(center.class, RayClass::Obstacle);
        assert!(center.clear_distance < 3.5);
    }

    #[test]
    fn test_wall_classified_separately() {
        let (mut world, mut fog) = make_world();
        let mut scanner = make_scanner();
        // Facing the +x wall from 5 units away.
        let pose = Pose::new(15.0, 0.0, 0.0);

        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);

        let center = &scan.rays[scan.rays.len() / 2];
        assert_eq!(center.class, RayClass::Wall);
        assert!(center.clear_distance <= 5.0 + 0.3);
    }

    #[test]
    fn test_target_detection_marks_and_sorts() {
        let (mut world, mut fog) = make_world();
        // Separate bearings so each target gets its own carrying rays.
        let far = world
            .place_target(Point2D::new(8.0, 4.0), HeatCategory::Survivor)
            .unwrap();
        let near = world
            .place_target(Point2D::new(4.0, -2.0), HeatCategory::Survivor)
            .unwrap();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);

        assert!(!scan.survivor_bearing.is_empty());
        let first = scan.nearest_survivor_ray().unwrap();
        assert_eq!(first.target_id, Some(near));
        assert!(first.target_distance < 5.0);

        assert_eq!(
            world.target(near).unwrap().state,
            DetectionState::Detected
        );
        assert_eq!(world.target(far).unwrap().state, DetectionState::Detected);
    }

    #[test]
    fn test_rescue_mode_extends_detection() {
        let (mut world, mut fog) = make_world();
        // 2.5 units past the 12-unit ray reach: outside the 2.0 base
        // detection radius of every ray point, inside the 3.0 rescue one.
        world
            .place_target(Point2D::new(14.5, 0.0), HeatCategory::Survivor)
            .unwrap();

        let mut scanner = make_scanner();
        let pose = Pose::identity();
        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);
        assert!(scan.survivor_bearing.is_empty());

        let mut scanner = make_scanner();
        let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::RescuePriority, 0);
        assert!(!scan.survivor_bearing.is_empty());
    }

    #[test]
    fn test_rate_limit_returns_cached() {
        let (mut world, mut fog) = make_world();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        let first = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);

        // A target appearing inside the interval is invisible until the
        // next fresh scan.
        world
            .place_target(Point2D::new(4.0, 0.0), HeatCategory::Survivor)
            .unwrap();
        let cached = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 10);
        assert_eq!(cached.timestamp_ms, first.timestamp_ms);
        assert!(cached.survivor_bearing.is_empty());

        let fresh = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 40);
        assert_eq!(fresh.timestamp_ms, 40);
        assert!(!fresh.survivor_bearing.is_empty());
    }

    #[test]
    fn test_invalidate_forces_fresh_scan() {
        let (mut world, mut fog) = make_world();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);
        scanner.invalidate();
        let fresh = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 5);
        assert_eq!(fresh.timestamp_ms, 5);
    }

    #[test]
    fn test_no_path_signal_after_consecutive_blocked_scans() {
        let (mut world, mut fog) = make_world();
        // Box the vehicle in completely.
        for (x, z) in [(2.0, 0.0), (-2.0, 0.0), (0.0, 2.0), (0.0, -2.0)] {
            world.add_obstacle(Point2D::new(x, z), 2.2).unwrap();
        }
        let mut scanner = make_scanner();
        let pose = Pose::identity();
        let limit = scanner.config().no_path_scan_limit;

        let mut now = 0;
        for i in 0..limit {
            let scan = scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, now);
            assert!(scan.clear.is_empty());
            let expected = i + 1 >= limit;
            assert_eq!(scan.no_clear_path, expected, "scan {}", i);
            now += scanner.config().scan_interval_ms;
        }
    }

    #[test]
    fn test_advanced_search_sees_through_obstacles() {
        let (mut world, mut fog) = make_world();
        world.add_obstacle(Point2D::new(3.0, 0.0), 1.0).unwrap();
        world
            .place_target(Point2D::new(7.0, 0.0), HeatCategory::Survivor)
            .unwrap();
        let pose = Pose::identity();

        let mut plain = make_scanner();
        let scan = plain.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);
        assert!(scan.survivor_bearing.is_empty());

        let mut config = ScannerConfig::default();
        config.advanced_search = true;
        let mut advanced = SensorScanner::new(config);
        let scan = advanced.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);
        assert!(!scan.survivor_bearing.is_empty());

        // Path classification is unaffected: the center ray stays blocked.
        let center = &scan.rays[scan.rays.len() / 2];
        assert_eq!(center.class, RayClass::Obstacle);
        assert!(center.clear_distance < 2.5);
    }

    #[test]
    fn test_scan_reveals_fog() {
        let (mut world, mut fog) = make_world();
        let mut scanner = make_scanner();
        let pose = Pose::identity();

        assert_eq!(fog.searched_percent(), 0.0);
        scanner.scan(&mut world, &mut fog, &pose, VehicleMode::Autonomous, 0);
        assert!(fog.searched_percent() > 0.0);
        assert_eq!(fog.opacity_at(&Point2D::new(0.0, 0.0)), 0.0);
    }
}
