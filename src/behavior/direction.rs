//! "Smart direction" selection.
//!
//! A pure scoring function over the clear rays of a scan: alignment with
//! the goal direction dominates, clear-path quality and heat signals add,
//! recently-visited sectors lose their novelty bonus, and weak rays are
//! penalized. Keeping it pure makes the weighting and tie-break rules
//! testable in isolation.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};

use crate::config::DirectionWeights;
use crate::core::math::{angle_diff, normalize_angle};
use crate::core::types::Point2D;
use crate::sensors::ScanResult;
use crate::state::VehicleMode;

/// Rightward heading nudge used when nothing else is available (radians).
const FALLBACK_NUDGE_RAD: f32 = 0.4;

/// Recency memory over (coarse cell × angle bucket) sectors.
///
/// Visiting a sector suppresses its novelty bonus; the bonus recovers
/// linearly over the decay horizon. This is what keeps the vehicle from
/// oscillating inside one pocket of the arena.
#[derive(Debug, Clone)]
pub struct SectorMemory {
    cell: f32,
    buckets: u8,
    decay_ms: u64,
    visits: HashMap<(i32, i32, u8), u64>,
}

impl SectorMemory {
    /// Create an empty memory.
    pub fn new(cell: f32, buckets: u8, decay_ms: u64) -> Self {
        Self {
            cell,
            buckets,
            decay_ms,
            visits: HashMap::new(),
        }
    }

    fn key(&self, position: &Point2D, heading: f32) -> (i32, i32, u8) {
        let bucket = ((normalize_angle(heading) + PI) / TAU * self.buckets as f32) as u8;
        (
            (position.x / self.cell).floor() as i32,
            (position.z / self.cell).floor() as i32,
            bucket.min(self.buckets - 1),
        )
    }

    /// Record that `heading` was taken from `position`.
    pub fn visit(&mut self, position: &Point2D, heading: f32, now_ms: u64) {
        let key = self.key(position, heading);
        self.visits.insert(key, now_ms);
    }

    /// Novelty of taking `heading` from `position`: 1.0 = never visited or
    /// fully decayed, 0.0 = just visited.
    pub fn novelty(&self, position: &Point2D, heading: f32, now_ms: u64) -> f32 {
        match self.visits.get(&self.key(position, heading)) {
            None => 1.0,
            Some(&last) => {
                let age = now_ms.saturating_sub(last) as f32;
                (age / self.decay_ms as f32).clamp(0.0, 1.0)
            }
        }
    }

    /// Forget all visits.
    pub fn clear(&mut self) {
        self.visits.clear();
    }
}

/// Inputs to direction scoring.
pub struct DirectionContext<'a> {
    /// Direction of the current goal (mission waypoint or locked target).
    pub goal_heading: Option<f32>,

    /// Current vehicle heading (used only for the final fallback nudge).
    pub current_heading: f32,

    /// Current vehicle position (sector memory lookups).
    pub position: Point2D,

    pub mode: VehicleMode,
    pub now_ms: u64,
    pub weights: &'a DirectionWeights,
    pub memory: &'a SectorMemory,
}

/// A scored candidate direction.
#[derive(Debug, Clone, Copy)]
pub struct ScoredDirection {
    /// Index into the scan's ray list.
    pub ray: usize,

    /// Absolute heading of the candidate.
    pub heading: f32,

    pub score: f32,
}

/// Score every clear ray, best first.
///
/// The sort is stable, so equal scores keep fan order and the outcome is
/// deterministic.
pub fn score_directions(scan: &ScanResult, ctx: &DirectionContext) -> Vec<ScoredDirection> {
    let w = ctx.weights;
    let signal = match ctx.mode {
        VehicleMode::RescuePriority => w.rescue_signal_factor,
        _ => 1.0,
    };

    let mut scored: Vec<ScoredDirection> = scan
        .clear
        .iter()
        .map(|&i| {
            let ray = &scan.rays[i];
            let mut score = w.quality * ray.quality;

            if let Some(goal) = ctx.goal_heading {
                let alignment = 1.0 - angle_diff(ray.angle, goal).abs() / PI;
                score += w.alignment * alignment;
            }
            if ray.carries_survivor {
                score += w.survivor * signal;
            } else if ray.carries_heat {
                score += w.heat * signal;
            }
            score += w.novelty * ctx.memory.novelty(&ctx.position, ray.angle, ctx.now_ms);
            if ray.quality < w.low_quality_threshold {
                score -= w.low_quality_penalty;
            }

            ScoredDirection {
                ray: i,
                heading: ray.angle,
                score,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Pick a heading from the scan.
///
/// The scored clear rays win outright; with no clear ray the fallbacks
/// run survivor-bearing, then best-path, then a forward-right nudge.
pub fn choose_heading(scan: &ScanResult, ctx: &DirectionContext) -> f32 {
    if let Some(best) = score_directions(scan, ctx).first() {
        return best.heading;
    }
    if let Some(ray) = scan.nearest_survivor_ray() {
        return ray.angle;
    }
    if let Some(ray) = scan
        .best_paths
        .iter()
        .map(|&i| &scan.rays[i])
        .max_by(|a, b| a.quality.total_cmp(&b.quality))
    {
        return ray.angle;
    }
    normalize_angle(ctx.current_heading - FALLBACK_NUDGE_RAD)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::{RayClass, RaySample};

    fn ray(angle: f32, quality: f32) -> RaySample {
        RaySample {
            angle,
            clear_distance: quality * 12.0,
            class: RayClass::Clear,
            quality,
            carries_heat: false,
            carries_survivor: false,
            target_id: None,
            target_distance: 0.0,
        }
    }

    fn scan_of(rays: Vec<RaySample>) -> ScanResult {
        let clear = (0..rays.len()).collect();
        ScanResult {
            rays,
            clear,
            ..Default::default()
        }
    }

    fn context<'a>(
        goal: Option<f32>,
        mode: VehicleMode,
        weights: &'a DirectionWeights,
        memory: &'a SectorMemory,
    ) -> DirectionContext<'a> {
        DirectionContext {
            goal_heading: goal,
            current_heading: 0.0,
            position: Point2D::new(0.0, 0.0),
            mode,
            now_ms: 0,
            weights,
            memory,
        }
    }

    #[test]
    fn test_alignment_dominates() {
        let weights = DirectionWeights::default();
        let memory = SectorMemory::new(5.0, 8, 8000);
        let scan = scan_of(vec![ray(0.0, 0.9), ray(1.0, 0.9), ray(-1.0, 0.9)]);

        let ctx = context(Some(1.0), VehicleMode::Autonomous, &weights, &memory);
        let scored = score_directions(&scan, &ctx);
        assert_eq!(scored[0].ray, 1);

        let ctx = context(Some(-1.0), VehicleMode::Autonomous, &weights, &memory);
        let scored = score_directions(&scan, &ctx);
        assert_eq!(scored[0].ray, 2);
    }

    #[test]
    fn test_rescue_mode_boosts_heat_rays() {
        let weights = DirectionWeights::default();
        let memory = SectorMemory::new(5.0, 8, 8000);
        let mut rays = vec![ray(0.0, 1.0), ray(std::f32::consts::FRAC_PI_2, 1.0)];
        rays[1].carries_heat = true;
        let scan = scan_of(rays);

        // Goal straight ahead. Standard mode sticks with the aligned ray.
        let ctx = context(Some(0.0), VehicleMode::Autonomous, &weights, &memory);
        assert_eq!(score_directions(&scan, &ctx)[0].ray, 0);

        // Rescue mode weighs the heat signal past the alignment edge.
        let ctx = context(Some(0.0), VehicleMode::RescuePriority, &weights, &memory);
        assert_eq!(score_directions(&scan, &ctx)[0].ray, 1);
    }

    #[test]
    fn test_recently_visited_sector_loses_bonus() {
        let weights = DirectionWeights::default();
        let mut memory = SectorMemory::new(5.0, 8, 8000);
        let scan = scan_of(vec![ray(0.0, 0.8), ray(std::f32::consts::FRAC_PI_2, 0.8)]);

        let ctx = context(None, VehicleMode::Autonomous, &weights, &memory);
        let before = score_directions(&scan, &ctx);
        // Equal scores keep fan order.
        assert_eq!(before[0].ray, 0);

        memory.visit(&Point2D::new(0.0, 0.0), 0.0, 0);
        let ctx = context(None, VehicleMode::Autonomous, &weights, &memory);
        let after = score_directions(&scan, &ctx);
        assert_eq!(after[0].ray, 1);
    }

    #[test]
    fn test_novelty_recovers_over_decay_horizon() {
        let mut memory = SectorMemory::new(5.0, 8, 8000);
        let pos = Point2D::new(0.0, 0.0);
        memory.visit(&pos, 0.0, 1000);

        assert_eq!(memory.novelty(&pos, 0.0, 1000), 0.0);
        let half = memory.novelty(&pos, 0.0, 5000);
        assert!(half > 0.4 && half < 0.6);
        assert_eq!(memory.novelty(&pos, 0.0, 20_000), 1.0);

        // A different angle bucket is unaffected.
        assert_eq!(memory.novelty(&pos, std::f32::consts::PI, 1000), 1.0);
    }

    #[test]
    fn test_low_quality_penalty() {
        let weights = DirectionWeights::default();
        let memory = SectorMemory::new(5.0, 8, 8000);
        // Identical angles apart from quality; the weak ray must rank last.
        let scan = scan_of(vec![ray(0.1, 0.1), ray(-0.1, 0.9)]);

        let ctx = context(None, VehicleMode::Autonomous, &weights, &memory);
        let scored = score_directions(&scan, &ctx);
        assert_eq!(scored[0].ray, 1);
        assert!(scored[1].score < scored[0].score);
    }

    #[test]
    fn test_fallback_survivor_over_best_path() {
        let weights = DirectionWeights::default();
        let memory = SectorMemory::new(5.0, 8, 8000);

        // No clear rays; one blocked survivor-bearing ray, one high-quality
        // blocked ray.
        let mut survivor = ray(1.2, 0.4);
        survivor.class = RayClass::Obstacle;
        survivor.carries_heat = true;
        survivor.carries_survivor = true;
        let mut long = ray(-1.2, 0.9);
        long.class = RayClass::Wall;

        let scan = ScanResult {
            rays: vec![survivor, long],
            blocked: vec![0, 1],
            best_paths: vec![1],
            survivor_bearing: vec![0],
            heat_bearing: vec![0],
            ..Default::default()
        };

        let ctx = context(None, VehicleMode::Autonomous, &weights, &memory);
        let heading = choose_heading(&scan, &ctx);
        assert!((heading - 1.2).abs() < 1e-6);
    }

    #[test]
    fn test_fallback_nudge_when_scan_is_empty() {
        let weights = DirectionWeights::default();
        let memory = SectorMemory::new(5.0, 8, 8000);
        let scan = ScanResult::default();

        let mut ctx = context(None, VehicleMode::Autonomous, &weights, &memory);
        ctx.current_heading = 1.0;
        let heading = choose_heading(&scan, &ctx);
        assert!((heading - (1.0 - FALLBACK_NUDGE_RAD)).abs() < 1e-6);
    }
}
