//! Fixed-size pathfinding grid.
//!
//! The grid covers the playable area with square cells. Each cell carries
//! walkability (fixed at world load), occupancy (reserved by the pathfinder,
//! released by the agent that owns it) and per-search A* bookkeeping.
//!
//! Grid coordinates are signed so callers can look past the edge; any
//! lookup outside `[0, width) × [0, height)` yields `None`.

use serde::{Deserialize, Serialize};

use crate::config::{ConfigError, GridConfig};
use crate::geometry::Vec2;

/// Cell coordinates on the grid. May lie outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub x: i32,
    pub y: i32,
}

impl GridPos {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Neighbor offsets in expansion order: left, left-down, left-up, right,
/// right-down, right-up, down, up.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 8] = [
    (-1, 0),
    (-1, -1),
    (-1, 1),
    (1, 0),
    (1, -1),
    (1, 1),
    (0, -1),
    (0, 1),
];

/// One grid cell.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub pos: GridPos,
    pub is_walkable: bool,
    pub is_occupied: bool,
    /// Cost from the search start. `u32::MAX` means unreached.
    pub g_cost: u32,
    /// Heuristic estimate to the search goal.
    pub h_cost: u32,
    /// Index of the cell this one was reached from in the current search.
    pub came_from: Option<usize>,
}

impl PathNode {
    fn new(pos: GridPos) -> Self {
        Self {
            pos,
            is_walkable: true,
            is_occupied: false,
            g_cost: u32::MAX,
            h_cost: 0,
            came_from: None,
        }
    }

    pub fn f_cost(&self) -> u32 {
        self.g_cost.saturating_add(self.h_cost)
    }

    /// Walkable and not reserved by another agent.
    pub fn is_free(&self) -> bool {
        self.is_walkable && !self.is_occupied
    }
}

/// The pathfinding lattice plus its world↔grid mapping.
#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    cell_size: f32,
    origin_offset: f32,
    cells: Vec<PathNode>,
}

impl Grid {
    /// Build a grid with every cell walkable and unoccupied.
    pub fn new(
        width: usize,
        height: usize,
        cell_size: f32,
        origin_offset: f32,
    ) -> Result<Self, ConfigError> {
        GridConfig {
            width,
            height,
            cell_size,
            origin_offset,
        }
        .validate()?;

        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(PathNode::new(GridPos::new(x as i32, y as i32)));
            }
        }

        Ok(Self {
            width,
            height,
            cell_size,
            origin_offset,
            cells,
        })
    }

    pub fn from_config(config: &GridConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.width,
            config.height,
            config.cell_size,
            config.origin_offset,
        )
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Cell containing a world position. The result may be out of bounds.
    pub fn world_to_grid(&self, world: Vec2) -> GridPos {
        GridPos {
            x: ((world.x + self.origin_offset) / self.cell_size).floor() as i32,
            y: ((world.y + self.origin_offset) / self.cell_size).floor() as i32,
        }
    }

    /// World position of a cell's center.
    pub fn grid_to_world(&self, pos: GridPos) -> Vec2 {
        Vec2 {
            x: pos.x as f32 * self.cell_size - self.origin_offset + self.cell_size / 2.0,
            y: pos.y as f32 * self.cell_size - self.origin_offset + self.cell_size / 2.0,
        }
    }

    pub fn in_bounds(&self, pos: GridPos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Flat index of an in-bounds cell.
    pub fn index_of(&self, pos: GridPos) -> Option<usize> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(pos.y as usize * self.width + pos.x as usize)
    }

    pub fn get_cell(&self, pos: GridPos) -> Option<&PathNode> {
        let index = self.index_of(pos)?;
        Some(&self.cells[index])
    }

    pub fn get_cell_mut(&mut self, pos: GridPos) -> Option<&mut PathNode> {
        let index = self.index_of(pos)?;
        Some(&mut self.cells[index])
    }

    pub fn cell_at_world(&self, world: Vec2) -> Option<&PathNode> {
        self.get_cell(self.world_to_grid(world))
    }

    pub(crate) fn node(&self, index: usize) -> &PathNode {
        &self.cells[index]
    }

    pub(crate) fn node_mut(&mut self, index: usize) -> &mut PathNode {
        &mut self.cells[index]
    }

    /// Returns `false` when `pos` is out of bounds.
    pub fn set_walkable(&mut self, pos: GridPos, walkable: bool) -> bool {
        match self.get_cell_mut(pos) {
            Some(cell) => {
                cell.is_walkable = walkable;
                true
            }
            None => false,
        }
    }

    /// Returns `false` when `pos` is out of bounds.
    pub fn set_occupied(&mut self, pos: GridPos, occupied: bool) -> bool {
        match self.get_cell_mut(pos) {
            Some(cell) => {
                cell.is_occupied = occupied;
                true
            }
            None => false,
        }
    }

    /// Clear the occupancy of the cell under a world position.
    ///
    /// Agents call this when they leave a tile the pathfinder reserved for
    /// them. Returns whether the cell was occupied.
    pub fn release(&mut self, world: Vec2) -> bool {
        let pos = self.world_to_grid(world);
        match self.get_cell_mut(pos) {
            Some(cell) if cell.is_occupied => {
                cell.is_occupied = false;
                true
            }
            _ => false,
        }
    }

    pub fn is_free(&self, pos: GridPos) -> bool {
        self.get_cell(pos).map(PathNode::is_free).unwrap_or(false)
    }

    /// In-bounds neighbors of `pos` in expansion order.
    pub fn neighbors(&self, pos: GridPos) -> impl Iterator<Item = GridPos> + '_ {
        NEIGHBOR_OFFSETS
            .iter()
            .map(move |&(dx, dy)| pos.offset(dx, dy))
            .filter(move |p| self.in_bounds(*p))
    }

    /// Reset A* bookkeeping on every cell.
    pub fn reset_search_state(&mut self) {
        for cell in &mut self.cells {
            cell.g_cost = u32::MAX;
            cell.h_cost = 0;
            cell.came_from = None;
        }
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_walkable).count()
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_occupied).count()
    }

    /// Clear every occupancy flag, e.g. when a world is reloaded.
    pub fn clear_occupancy(&mut self) {
        for cell in &mut self.cells {
            cell.is_occupied = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_grid() -> Grid {
        Grid::new(200, 200, 10.0, 1000.0).unwrap()
    }

    #[test]
    fn test_origin_maps_to_corner() {
        let grid = default_grid();
        assert_eq!(grid.world_to_grid(Vec2::new(-1000.0, -1000.0)), GridPos::new(0, 0));
        assert_eq!(grid.world_to_grid(Vec2::new(-995.0, -991.0)), GridPos::new(0, 0));
        assert_eq!(grid.world_to_grid(Vec2::new(0.0, 0.0)), GridPos::new(100, 100));
        assert_eq!(grid.grid_to_world(GridPos::new(0, 0)), Vec2::new(-995.0, -995.0));
    }

    #[test]
    fn test_roundtrip_lands_in_same_cell() {
        let grid = default_grid();
        for &(x, y) in &[(-999.9, -999.9), (0.0, 0.0), (13.7, -42.1), (999.0, 5.5)] {
            let p = Vec2::new(x, y);
            let cell = grid.world_to_grid(p);
            let center = grid.grid_to_world(cell);
            assert!((center.x - p.x).abs() <= 5.0, "x off for {:?}", p);
            assert!((center.y - p.y).abs() <= 5.0, "y off for {:?}", p);
            assert_eq!(grid.world_to_grid(center), cell);
        }
    }

    #[test]
    fn test_negative_world_beyond_origin_is_out_of_bounds() {
        let grid = default_grid();
        let pos = grid.world_to_grid(Vec2::new(-1000.5, 0.0));
        assert_eq!(pos.x, -1);
        assert!(grid.get_cell(pos).is_none());
    }

    #[test]
    fn test_boundary_safety_edges_and_corners() {
        let grid = Grid::new(10, 8, 10.0, 50.0).unwrap();
        let outside = [
            GridPos::new(-1, 4),
            GridPos::new(10, 4),
            GridPos::new(4, -1),
            GridPos::new(4, 8),
            GridPos::new(-1, -1),
            GridPos::new(10, -1),
            GridPos::new(-1, 8),
            GridPos::new(10, 8),
        ];
        for pos in outside {
            assert!(grid.get_cell(pos).is_none(), "{:?} should be outside", pos);
        }
        assert!(grid.get_cell(GridPos::new(0, 0)).is_some());
        assert!(grid.get_cell(GridPos::new(9, 7)).is_some());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(matches!(
            Grid::new(0, 10, 10.0, 0.0),
            Err(ConfigError::EmptyGrid { .. })
        ));
        assert!(matches!(
            Grid::new(10, 10, 0.0, 0.0),
            Err(ConfigError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_corner_has_three_neighbors() {
        let grid = Grid::new(5, 5, 10.0, 0.0).unwrap();
        let n: Vec<_> = grid.neighbors(GridPos::new(0, 0)).collect();
        assert_eq!(
            n,
            vec![GridPos::new(1, 0), GridPos::new(1, 1), GridPos::new(0, 1)]
        );
        assert_eq!(grid.neighbors(GridPos::new(2, 2)).count(), 8);
    }

    #[test]
    fn test_release_clears_occupancy() {
        let mut grid = Grid::new(5, 5, 10.0, 0.0).unwrap();
        let pos = GridPos::new(2, 3);
        assert!(grid.set_occupied(pos, true));
        assert!(!grid.is_free(pos));
        assert!(grid.release(grid.grid_to_world(pos)));
        assert!(grid.is_free(pos));
        assert!(!grid.release(grid.grid_to_world(pos)));
    }

    #[test]
    fn test_setters_report_out_of_bounds() {
        let mut grid = Grid::new(5, 5, 10.0, 0.0).unwrap();
        assert!(!grid.set_walkable(GridPos::new(5, 0), false));
        assert!(!grid.set_occupied(GridPos::new(0, -1), true));
        assert_eq!(grid.walkable_count(), 25);
        assert_eq!(grid.occupied_count(), 0);
    }
}
