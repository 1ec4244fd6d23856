//! Fog-of-war map.
//!
//! A row-major opacity grid over the arena's top-down projection. Cells
//! start fully fogged (1.0) and are revealed (lowered toward 0.0) as the
//! vehicle or its sensor rays pass near them. Reveals are monotonic: a
//! cell's opacity never increases within a run.

use crate::core::types::Point2D;
use crate::world::ArenaBounds;

/// Opacity below which a cell counts as searched.
const SEARCHED_OPACITY: f32 = 0.5;

/// Fraction of the reveal radius over which opacity fades back to fogged.
const EDGE_BAND: f32 = 0.4;

/// Monotonic fog-of-war opacity grid.
#[derive(Debug, Clone)]
pub struct FogMap {
    /// Cell size in world units.
    resolution: f32,

    /// Cells per side.
    side: usize,

    /// Arena half-extent covered by the grid.
    half_extent: f32,

    /// Row-major opacity values, 1.0 = fogged, 0.0 = revealed.
    cells: Vec<f32>,
}

impl FogMap {
    /// Create a fully fogged map covering the arena.
    pub fn new(arena: &ArenaBounds, resolution: f32) -> Self {
        let side = (arena.span() / resolution).ceil().max(1.0) as usize;
        Self {
            resolution,
            side,
            half_extent: arena.half_extent(),
            cells: vec![1.0; side * side],
        }
    }

    /// Cells per side.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Cell index for a world point, if inside the grid.
    pub fn world_to_cell(&self, point: &Point2D) -> Option<(usize, usize)> {
        let cx = (point.x + self.half_extent) / self.resolution;
        let cz = (point.z + self.half_extent) / self.resolution;
        if cx < 0.0 || cz < 0.0 {
            return None;
        }
        let (cx, cz) = (cx as usize, cz as usize);
        if cx >= self.side || cz >= self.side {
            return None;
        }
        Some((cx, cz))
    }

    /// Opacity of a cell.
    pub fn opacity(&self, cx: usize, cz: usize) -> f32 {
        self.cells[cz * self.side + cx]
    }

    /// Opacity at a world point (1.0 outside the grid).
    pub fn opacity_at(&self, point: &Point2D) -> f32 {
        self.world_to_cell(point)
            .map(|(cx, cz)| self.opacity(cx, cz))
            .unwrap_or(1.0)
    }

    /// Reveal cells around a world point.
    ///
    /// Cells within `radius` clear fully; a soft band beyond fades out.
    /// Only ever lowers opacity.
    pub fn reveal_circle(&mut self, center: &Point2D, radius: f32) {
        let outer = radius * (1.0 + EDGE_BAND);
        let min = Point2D::new(center.x - outer, center.z - outer);
        let max = Point2D::new(center.x + outer, center.z + outer);

        let to_index = |v: f32| ((v + self.half_extent) / self.resolution).floor();
        let lo_x = to_index(min.x).max(0.0) as usize;
        let lo_z = to_index(min.z).max(0.0) as usize;
        let hi_x = (to_index(max.x) as isize).min(self.side as isize - 1);
        let hi_z = (to_index(max.z) as isize).min(self.side as isize - 1);
        if hi_x < 0 || hi_z < 0 {
            return;
        }

        for cz in lo_z..=(hi_z as usize) {
            for cx in lo_x..=(hi_x as usize) {
                let cell_center = Point2D::new(
                    (cx as f32 + 0.5) * self.resolution - self.half_extent,
                    (cz as f32 + 0.5) * self.resolution - self.half_extent,
                );
                let dist = cell_center.distance(center);
                let new_opacity = if dist <= radius {
                    0.0
                } else if dist <= outer {
                    (dist - radius) / (outer - radius)
                } else {
                    continue;
                };
                let cell = &mut self.cells[cz * self.side + cx];
                if new_opacity < *cell {
                    *cell = new_opacity;
                }
            }
        }
    }

    /// Percentage of cells searched (opacity below the searched threshold).
    pub fn searched_percent(&self) -> f32 {
        if self.cells.is_empty() {
            return 0.0;
        }
        let searched = self
            .cells
            .iter()
            .filter(|&&o| o < SEARCHED_OPACITY)
            .count();
        100.0 * searched as f32 / self.cells.len() as f32
    }

    /// Re-fog the whole map (arena reset only).
    pub fn reset(&mut self) {
        self.cells.fill(1.0);
    }
}
