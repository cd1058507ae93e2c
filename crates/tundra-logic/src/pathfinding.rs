//! A* pathfinding over the tile grid.
//!
//! `Pathfinder` owns the [`Grid`] and answers navigation requests from NPC
//! controllers. Searches are 8-connected with orthogonal cost 10 and
//! diagonal cost 14, guided by the octile distance.
//!
//! A successful search reserves its destination cell (marks it occupied) so
//! the next agent asking for the same tile is redirected to a free neighbor.
//! The agent that received the path releases the reservation when it leaves
//! the tile; the pathfinder never clears occupancy on its own.
//!
//! Every failure (out of bounds, blocked destination with no free neighbor,
//! cost cap exceeded, frontier exhausted) is reported as `None`.

use rand::Rng;

use crate::config::PathfindingConfig;
use crate::constants::path::{DIAGONAL_COST, END_JITTER, MAX_F_COST, STRAIGHT_COST};
use crate::geometry::Vec2;
use crate::grid::{Grid, GridPos, NEIGHBOR_OFFSETS};

/// Line-of-sight test against the path-blocking collision layer.
pub trait LineOfSight {
    fn is_clear(&self, from: Vec2, to: Vec2) -> bool;
}

/// Nothing blocks sight. Useful for open terrain and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenLineOfSight;

impl LineOfSight for OpenLineOfSight {
    fn is_clear(&self, _from: Vec2, _to: Vec2) -> bool {
        true
    }
}

impl<F> LineOfSight for F
where
    F: Fn(Vec2, Vec2) -> bool,
{
    fn is_clear(&self, from: Vec2, to: Vec2) -> bool {
        self(from, to)
    }
}

/// Octile distance between two cells in path-cost units.
pub fn octile_distance(a: GridPos, b: GridPos) -> u32 {
    let dx = a.x.abs_diff(b.x);
    let dy = a.y.abs_diff(b.y);
    DIAGONAL_COST * dx.min(dy) + STRAIGHT_COST * dx.abs_diff(dy)
}

/// Total movement cost of a tile path.
pub fn path_cost(path: &[GridPos]) -> u32 {
    path.windows(2).map(|w| octile_distance(w[0], w[1])).sum()
}

/// Grid pathfinder with destination reservation.
#[derive(Debug, Clone)]
pub struct Pathfinder {
    grid: Grid,
    max_f_cost: u32,
    end_jitter: f32,
}

impl Pathfinder {
    pub fn new(grid: Grid) -> Self {
        Self {
            grid,
            max_f_cost: MAX_F_COST,
            end_jitter: END_JITTER,
        }
    }

    pub fn with_config(grid: Grid, config: &PathfindingConfig) -> Self {
        Self {
            grid,
            max_f_cost: config.max_f_cost,
            end_jitter: config.end_jitter,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    /// Release the reservation on the tile under `world`.
    pub fn release(&mut self, world: Vec2) -> bool {
        self.grid.release(world)
    }

    /// Path between two world positions as a list of cell centers,
    /// starting with the start cell.
    pub fn find_path(&mut self, start: Vec2, end: Vec2) -> Option<Vec<Vec2>> {
        let start = self.grid.world_to_grid(start);
        let end = self.grid.world_to_grid(end);
        let tiles = self.find_tile_path(start, end)?;
        Some(
            tiles
                .into_iter()
                .map(|t| self.grid.grid_to_world(t))
                .collect(),
        )
    }

    /// Path post-processed for natural movement: straightened against
    /// `sight`, final waypoint jittered, first waypoint dropped.
    ///
    /// Returns an empty path when the requester already stands on the
    /// destination tile.
    pub fn find_ideal_path(
        &mut self,
        start: Vec2,
        end: Vec2,
        sight: &impl LineOfSight,
        rng: &mut impl Rng,
    ) -> Option<Vec<Vec2>> {
        let raw = self.find_path(start, end)?;
        let mut path = string_pull(&raw, sight);

        if self.end_jitter > 0.0 {
            if let Some(last) = path.last_mut() {
                last.x += rng.gen_range(-self.end_jitter..=self.end_jitter);
                last.y += rng.gen_range(-self.end_jitter..=self.end_jitter);
            }
        }

        if !path.is_empty() {
            path.remove(0);
        }
        Some(path)
    }

    /// A* over grid cells. On success the returned path runs from `start`
    /// to the effective goal (which may be a neighbor of `end`) and the goal
    /// cell is marked occupied.
    pub fn find_tile_path(&mut self, start: GridPos, end: GridPos) -> Option<Vec<GridPos>> {
        let start_index = self.grid.index_of(start)?;
        let goal = self.resolve_goal(end)?;
        let goal_index = self.grid.index_of(goal)?;

        self.grid.reset_search_state();

        let node_count = self.grid.width() * self.grid.height();
        let mut closed = vec![false; node_count];
        let mut in_open = vec![false; node_count];
        let mut open: Vec<usize> = vec![start_index];
        in_open[start_index] = true;

        {
            let node = self.grid.node_mut(start_index);
            node.g_cost = 0;
            node.h_cost = octile_distance(start, goal);
        }

        while !open.is_empty() {
            let slot = lowest_f_cost_slot(&self.grid, &open);
            let current = open[slot];

            if current == goal_index {
                self.grid.node_mut(goal_index).is_occupied = true;
                return Some(self.reconstruct(start_index, goal_index));
            }

            let (current_pos, current_g, current_f) = {
                let node = self.grid.node(current);
                (node.pos, node.g_cost, node.f_cost())
            };
            if current_f > self.max_f_cost {
                return None;
            }

            open.remove(slot);
            in_open[current] = false;
            closed[current] = true;

            for &(dx, dy) in NEIGHBOR_OFFSETS.iter() {
                let neighbor_pos = current_pos.offset(dx, dy);
                let Some(neighbor) = self.grid.index_of(neighbor_pos) else {
                    continue;
                };
                if closed[neighbor] {
                    continue;
                }
                if !self.grid.node(neighbor).is_free() {
                    closed[neighbor] = true;
                    continue;
                }

                let tentative_g = current_g + octile_distance(current_pos, neighbor_pos);
                let node = self.grid.node_mut(neighbor);
                if tentative_g < node.g_cost {
                    node.came_from = Some(current);
                    node.g_cost = tentative_g;
                    node.h_cost = octile_distance(neighbor_pos, goal);
                    if !in_open[neighbor] {
                        in_open[neighbor] = true;
                        open.push(neighbor);
                    }
                }
            }
        }

        None
    }

    /// The destination itself when free, otherwise its first free neighbor.
    fn resolve_goal(&self, end: GridPos) -> Option<GridPos> {
        let cell = self.grid.get_cell(end)?;
        if cell.is_free() {
            return Some(end);
        }
        self.grid.neighbors(end).find(|&n| self.grid.is_free(n))
    }

    fn reconstruct(&self, start_index: usize, goal_index: usize) -> Vec<GridPos> {
        let mut path = vec![self.grid.node(goal_index).pos];
        let mut cursor = goal_index;
        while cursor != start_index {
            match self.grid.node(cursor).came_from {
                Some(prev) => {
                    cursor = prev;
                    path.push(self.grid.node(cursor).pos);
                }
                None => break,
            }
        }
        path.reverse();
        path
    }
}

/// First slot holding the lowest f-cost; earlier entries win ties.
fn lowest_f_cost_slot(grid: &Grid, open: &[usize]) -> usize {
    let mut best = 0;
    let mut best_f = grid.node(open[0]).f_cost();
    for (slot, &index) in open.iter().enumerate().skip(1) {
        let f = grid.node(index).f_cost();
        if f < best_f {
            best = slot;
            best_f = f;
        }
    }
    best
}

/// Remove waypoints that have direct sight past them.
///
/// From each anchor, the farthest remaining point with a clear line is
/// kept and everything between is dropped; the window shrinks from the end
/// until a clear line is found (adjacent points are always kept).
pub fn string_pull(points: &[Vec2], sight: &impl LineOfSight) -> Vec<Vec2> {
    if points.len() <= 2 {
        return points.to_vec();
    }

    let mut result = vec![points[0]];
    let mut anchor = 0;
    let last = points.len() - 1;
    while anchor < last {
        let mut end = last;
        while end > anchor + 1 && !sight.is_clear(points[anchor], points[end]) {
            end -= 1;
        }
        result.push(points[end]);
        anchor = end;
    }
    result
}
