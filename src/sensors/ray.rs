//! Ray samples and classified scan results.
//!
//! A [`RaySample`] is recomputed on every scan and never persisted across
//! ticks. The [`ScanResult`] partitions samples into clear/blocked (every
//! ray is in exactly one) with heat/survivor overlays on top.

use serde::{Deserialize, Serialize};

/// What terminated a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RayClass {
    /// Nothing hit within max range.
    Clear,

    /// First hit was an obstacle footprint.
    Obstacle,

    /// First hit was the arena wall.
    Wall,
}

impl RayClass {
    /// Whether the ray counts as blocked for path purposes.
    pub fn is_blocked(&self) -> bool {
        !matches!(self, RayClass::Clear)
    }
}

/// One classified sensor ray.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RaySample {
    /// Absolute heading of the ray (radians).
    pub angle: f32,

    /// Unobstructed travel distance.
    pub clear_distance: f32,

    /// Termination classification.
    pub class: RayClass,

    /// Quality score: clear distance over max range, in [0, 1].
    pub quality: f32,

    /// Ray passed within detection range of an active target.
    pub carries_heat: bool,

    /// The carried target is a survivor (topmost rescuable category).
    pub carries_survivor: bool,

    /// Id of the carried target, if any.
    pub target_id: Option<u32>,

    /// Vehicle-to-target distance for the carried target.
    pub target_distance: f32,
}

/// Classified result of one scan.
///
/// Partition invariant: every ray index appears in exactly one of `clear`
/// and `blocked`. `heat_bearing`/`survivor_bearing` are overlays sorted by
/// target distance ascending; `best_paths`/`emergency_exits` are quality
/// bands over the clear-run length regardless of what finally stopped the
/// ray.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// All ray samples, in fan order.
    pub rays: Vec<RaySample>,

    /// Indices of rays classified clear.
    pub clear: Vec<usize>,

    /// Indices of rays classified blocked (wall or obstacle).
    pub blocked: Vec<usize>,

    /// Indices with quality above the best-path threshold.
    pub best_paths: Vec<usize>,

    /// Indices with quality above the emergency-exit threshold.
    pub emergency_exits: Vec<usize>,

    /// Heat-carrying indices, nearest target first.
    pub heat_bearing: Vec<usize>,

    /// Survivor-carrying indices, nearest target first.
    pub survivor_bearing: Vec<usize>,

    /// Set once the scanner has seen only blocked rays for the configured
    /// number of consecutive scans. Normal operating condition, not an
    /// error.
    pub no_clear_path: bool,

    /// Clock value when this scan was taken (ms).
    pub timestamp_ms: u64,
}

impl ScanResult {
    /// Whether any ray is classified clear.
    pub fn has_clear(&self) -> bool {
        !self.clear.is_empty()
    }

    /// The clear ray with the longest clear run, if any.
    pub fn best_clear_ray(&self) -> Option<&RaySample> {
        self.clear
            .iter()
            .map(|&i| &self.rays[i])
            .max_by(|a, b| a.quality.total_cmp(&b.quality))
    }

    /// The survivor-bearing ray with the nearest target, if any.
    pub fn nearest_survivor_ray(&self) -> Option<&RaySample> {
        self.survivor_bearing.first().map(|&i| &self.rays[i])
    }

    /// The heat-bearing ray with the nearest target, if any.
    pub fn nearest_heat_ray(&self) -> Option<&RaySample> {
        self.heat_bearing.first().map(|&i| &self.rays[i])
    }

    /// The emergency-exit ray with the highest quality, if any.
    pub fn best_emergency_exit(&self) -> Option<&RaySample> {
        self.emergency_exits
            .iter()
            .map(|&i| &self.rays[i])
            .max_by(|a, b| a.quality.total_cmp(&b.quality))
    }
}
