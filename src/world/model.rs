//! Aggregate world model: arena, obstacles, and targets.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::Point2D;
use crate::error::{NavError, Result};
use crate::world::{ArenaBounds, DetectionState, HeatCategory, HeatTarget, Obstacle};

/// Retry budget when looking for an obstacle-free respawn point.
const RESPAWN_ATTEMPTS: u32 = 16;

/// The arena with its static obstacles and live targets.
#[derive(Debug)]
pub struct WorldModel {
    arena: ArenaBounds,
    obstacles: Vec<Obstacle>,
    targets: Vec<HeatTarget>,
    next_obstacle_id: u32,
    next_target_id: u32,
    rng: StdRng,
}

impl WorldModel {
    /// Create an empty world. `seed` = 0 seeds placement from OS entropy.
    pub fn new(arena: ArenaBounds, seed: u64) -> Self {
        let rng = if seed == 0 {
            StdRng::from_os_rng()
        } else {
            StdRng::seed_from_u64(seed)
        };
        Self {
            arena,
            obstacles: Vec::new(),
            targets: Vec::new(),
            next_obstacle_id: 0,
            next_target_id: 0,
            rng,
        }
    }

    /// Arena bounds.
    pub fn arena(&self) -> &ArenaBounds {
        &self.arena
    }

    /// All obstacles.
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// All targets (including any mid-collection this tick).
    pub fn targets(&self) -> &[HeatTarget] {
        &self.targets
    }

    /// Active (uncollected) targets.
    pub fn active_targets(&self) -> impl Iterator<Item = &HeatTarget> {
        self.targets.iter().filter(|t| t.is_active())
    }

    /// Look up a target by id.
    pub fn target(&self, id: u32) -> Option<&HeatTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Look up a target mutably by id.
    pub fn target_mut(&mut self, id: u32) -> Option<&mut HeatTarget> {
        self.targets.iter_mut().find(|t| t.id == id)
    }

    /// Add a static obstacle. Fails if the center is outside the arena.
    pub fn add_obstacle(&mut self, position: Point2D, radius: f32) -> Result<u32> {
        if !self.arena.contains(&position) {
            return Err(NavError::InvalidPlacement {
                x: position.x,
                z: position.z,
                reason: "obstacle center outside arena".into(),
            });
        }
        let id = self.next_obstacle_id;
        self.next_obstacle_id += 1;
        self.obstacles.push(Obstacle::new(id, position, radius));
        Ok(id)
    }

    /// Place a target at an explicit position.
    ///
    /// Fails on placement inside an obstacle or outside the usable
    /// interior; that is host misuse, not a runtime condition.
    pub fn place_target(&mut self, position: Point2D, category: HeatCategory) -> Result<u32> {
        if !self.arena.contains_usable(&position) {
            return Err(NavError::InvalidPlacement {
                x: position.x,
                z: position.z,
                reason: "target outside usable interior".into(),
            });
        }
        if self.blocked(&position, 0.0) {
            return Err(NavError::InvalidPlacement {
                x: position.x,
                z: position.z,
                reason: "target inside obstacle footprint".into(),
            });
        }
        Ok(self.push_target(position, category))
    }

    /// Spawn a target of the given category at a random obstacle-free
    /// interior point.
    ///
    /// Returns `None` (with a warning) if no clear point was found within
    /// the retry budget; skipping a respawn is policy, not an error.
    pub fn spawn_target(&mut self, category: HeatCategory) -> Option<u32> {
        let position = self.random_clear_point(RESPAWN_ATTEMPTS)?;
        Some(self.push_target(position, category))
    }

    /// Remove a target outright (external despawn). Returns the target.
    pub fn remove_target(&mut self, id: u32) -> Option<HeatTarget> {
        let idx = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(idx))
    }

    /// Collect a target: mark it collected and remove it from the world.
    ///
    /// The caller decides the respawn policy (the engine spawns exactly one
    /// replacement of the same category).
    pub fn collect_target(&mut self, id: u32) -> Option<HeatTarget> {
        let idx = self.targets.iter().position(|t| t.id == id && t.is_active())?;
        let mut target = self.targets.remove(idx);
        target.state = DetectionState::Collected;
        log::info!(
            "Collected {} target {} at ({:.1}, {:.1})",
            target.category.as_str(),
            target.id,
            target.position.x,
            target.position.z
        );
        Some(target)
    }

    /// Whether a point is inside any obstacle footprint (inflated by
    /// `clearance`).
    pub fn blocked(&self, point: &Point2D, clearance: f32) -> bool {
        self.obstacles.iter().any(|o| o.contains(point, clearance))
    }

    /// Categories of targets currently detected (or locked), deduplicated,
    /// in spawn order.
    pub fn detected_categories(&self) -> Vec<HeatCategory> {
        let mut seen = Vec::new();
        for target in &self.targets {
            let visible = matches!(
                target.state,
                DetectionState::Detected | DetectionState::Locked
            );
            if visible && !seen.contains(&target.category) {
                seen.push(target.category);
            }
        }
        seen
    }

    /// Remove all obstacles and targets (arena reset).
    pub fn clear(&mut self) {
        self.obstacles.clear();
        self.targets.clear();
        self.next_obstacle_id = 0;
        self.next_target_id = 0;
    }

    fn push_target(&mut self, position: Point2D, category: HeatCategory) -> u32 {
        let id = self.next_target_id;
        self.next_target_id += 1;
        self.targets.push(HeatTarget::new(id, position, category));
        id
    }

    fn random_clear_point(&mut self, attempts: u32) -> Option<Point2D> {
        let usable = self.arena.usable_half_extent();
        for _ in 0..attempts {
            let candidate = Point2D::new(
                self.rng.random_range(-usable..usable),
                self.rng.random_range(-usable..usable),
            );
            if !self.blocked(&candidate, 0.5) {
                return Some(candidate);
            }
        }
        log::warn!("No clear spawn point found after {} attempts", attempts);
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_world() -> WorldModel {
        WorldModel::new(ArenaBounds::new(20.0, 1.0), 42)
    }

    #[test]
    fn test_obstacle_blocking() {
        let mut world = make_world();
        world.add_obstacle(Point2D::new(0.0, 0.0), 3.0).unwrap();

        assert!(world.blocked(&Point2D::new(1.0, 1.0), 0.0));
        assert!(!world.blocked(&Point2D::new(5.0, 5.0), 0.0));
    }

    #[test]
    fn test_obstacle_outside_arena_rejected() {
        let mut world = make_world();
        assert!(world.add_obstacle(Point2D::new(30.0, 0.0), 2.0).is_err());
    }

    #[test]
    fn test_place_target_validates() {
        let mut world = make_world();
        world.add_obstacle(Point2D::new(0.0, 0.0), 3.0).unwrap();

        assert!(world
            .place_target(Point2D::new(1.0, 0.0), HeatCategory::Survivor)
            .is_err());
        assert!(world
            .place_target(Point2D::new(25.0, 0.0), HeatCategory::Survivor)
            .is_err());
        assert!(world
            .place_target(Point2D::new(10.0, 10.0), HeatCategory::Survivor)
            .is_ok());
    }

    #[test]
    fn test_spawn_avoids_obstacles() {
        let mut world = make_world();
        world.add_obstacle(Point2D::new(0.0, 0.0), 3.0).unwrap();

        for _ in 0..20 {
            if let Some(id) = world.spawn_target(HeatCategory::Injured) {
                let target = world.target(id).unwrap();
                assert!(!world.blocked(&target.position, 0.0));
            }
        }
    }

    #[test]
    fn test_collect_removes_and_reports() {
        let mut world = make_world();
        let id = world
            .place_target(Point2D::new(5.0, 5.0), HeatCategory::Survivor)
            .unwrap();

        let collected = world.collect_target(id).unwrap();
        assert_eq!(collected.id, id);
        assert_eq!(collected.state, DetectionState::Collected);
        assert!(world.target(id).is_none());

        // Double collection is a no-op.
        assert!(world.collect_target(id).is_none());
    }

    #[test]
    fn test_detected_categories_dedup() {
        let mut world = make_world();
        let a = world
            .place_target(Point2D::new(5.0, 5.0), HeatCategory::Survivor)
            .unwrap();
        let b = world
            .place_target(Point2D::new(6.0, 6.0), HeatCategory::Survivor)
            .unwrap();
        let c = world
            .place_target(Point2D::new(7.0, 7.0), HeatCategory::Animal)
            .unwrap();

        assert!(world.detected_categories().is_empty());

        world.target_mut(a).unwrap().state = DetectionState::Detected;
        world.target_mut(b).unwrap().state = DetectionState::Detected;
        world.target_mut(c).unwrap().state = DetectionState::Locked;

        let detected = world.detected_categories();
        assert_eq!(detected.len(), 2);
        assert!(detected.contains(&HeatCategory::Survivor));
        assert!(detected.contains(&HeatCategory::Animal));
    }

    #[test]
    fn test_seeded_spawns_are_deterministic() {
        let mut a = make_world();
        let mut b = make_world();
        for _ in 0..5 {
            let ta = a.spawn_target(HeatCategory::Survivor).unwrap();
            let tb = b.spawn_target(HeatCategory::Survivor).unwrap();
            let pa = a.target(ta).unwrap().position;
            let pb = b.target(tb).unwrap().position;
            assert_eq!(pa.x, pb.x);
            assert_eq!(pa.z, pb.z);
        }
    }
}
