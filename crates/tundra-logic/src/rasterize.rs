//! Obstacle rasterization - static world geometry onto the pathfinding grid.
//!
//! Runs once at world load. Each obstacle's rotated rectangle is reduced to
//! the grid-aligned bounding box of its four corners and every cell in that
//! box is marked unwalkable. Rotated obstacles therefore block more cells
//! than they cover; only axis-aligned footprints are exact.
//!
//! Doors never block the grid: whether a door is open is a physics concern.

use serde::{Deserialize, Serialize};

use crate::geometry::{OrientedRect, Vec2};
use crate::grid::{Grid, GridPos};
use crate::pathfinding::LineOfSight;

/// Classification of a static scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObstacleKind {
    Solid,
    Door,
}

fn default_blocks_path() -> bool {
    true
}

/// A static obstacle as authored in the world scene.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub position: Vec2,
    /// Degrees, counter-clockwise.
    #[serde(default)]
    pub rotation: f32,
    /// Full footprint size in world units.
    pub scale: Vec2,
    pub kind: ObstacleKind,
    /// Whether the obstacle is on the path-blocking layer used for
    /// line-of-sight straightening. Low cover that agents can see past
    /// still blocks the grid but not sight.
    #[serde(default = "default_blocks_path")]
    pub blocks_path: bool,
}

impl Obstacle {
    pub fn solid(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
            kind: ObstacleKind::Solid,
            blocks_path: true,
        }
    }

    pub fn door(position: Vec2, rotation: f32, scale: Vec2) -> Self {
        Self {
            position,
            rotation,
            scale,
            kind: ObstacleKind::Door,
            blocks_path: false,
        }
    }

    pub fn rect(&self) -> OrientedRect {
        OrientedRect::new(self.position, self.rotation, self.scale)
    }
}

/// Summary of one rasterization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RasterReport {
    pub obstacles_marked: usize,
    pub doors_skipped: usize,
    /// Obstacles whose footprint lies entirely off the grid.
    pub obstacles_outside: usize,
    /// Cells newly made unwalkable.
    pub cells_blocked: usize,
}

/// Inclusive grid rectangle covered by an obstacle, clipped to the grid.
/// `None` when the footprint misses the grid entirely.
pub fn footprint_cells(grid: &Grid, obstacle: &Obstacle) -> Option<(GridPos, GridPos)> {
    let corners = obstacle.rect().corners().map(|c| grid.world_to_grid(c));

    let min_x = corners.iter().map(|c| c.x).min()?;
    let max_x = corners.iter().map(|c| c.x).max()?;
    let min_y = corners.iter().map(|c| c.y).min()?;
    let max_y = corners.iter().map(|c| c.y).max()?;

    let last_x = grid.width() as i32 - 1;
    let last_y = grid.height() as i32 - 1;
    if max_x < 0 || max_y < 0 || min_x > last_x || min_y > last_y {
        return None;
    }

    Some((
        GridPos::new(min_x.max(0), min_y.max(0)),
        GridPos::new(max_x.min(last_x), max_y.min(last_y)),
    ))
}

/// Mark every non-door obstacle's footprint unwalkable.
pub fn rasterize_obstacles(grid: &mut Grid, obstacles: &[Obstacle]) -> RasterReport {
    let mut report = RasterReport::default();

    for obstacle in obstacles {
        if obstacle.kind == ObstacleKind::Door {
            report.doors_skipped += 1;
            continue;
        }
        let Some((min, max)) = footprint_cells(grid, obstacle) else {
            report.obstacles_outside += 1;
            continue;
        };

        for y in min.y..=max.y {
            for x in min.x..=max.x {
                if let Some(cell) = grid.get_cell_mut(GridPos::new(x, y)) {
                    if cell.is_walkable {
                        cell.is_walkable = false;
                        report.cells_blocked += 1;
                    }
                }
            }
        }
        report.obstacles_marked += 1;
    }

    report
}

/// The obstacles that block sight for path straightening.
#[derive(Debug, Clone, Default)]
pub struct PathBlockingLayer {
    rects: Vec<OrientedRect>,
}

impl PathBlockingLayer {
    pub fn from_obstacles(obstacles: &[Obstacle]) -> Self {
        Self {
            rects: obstacles
                .iter()
                .filter(|o| o.kind != ObstacleKind::Door && o.blocks_path)
                .map(Obstacle::rect)
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }
}

impl LineOfSight for PathBlockingLayer {
    fn is_clear(&self, from: Vec2, to: Vec2) -> bool {
        !self.rects.iter().any(|r| r.intersects_segment(from, to))
    }
}
