use macroquad::prelude::*;

use crate::layer::CollisionCell;
use crate::map::LayeredGrid;

use super::world_to_tile;

/// Scan order around the entity tile: north, south, east, west
pub const NEIGHBOR_ORDER: [(i64, i64); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];

/// An `Action` cell next to the entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentAction {
    /// Row of the action cell
    pub row: usize,
    /// Column of the action cell
    pub col: usize,
    /// Handler name, if one was authored
    pub payload: Option<String>,
}

/// First `Action` cell among the 4-connected neighbours of `(row, col)`.
///
/// `(row, col)` itself may sit one past the grid edge (an entity clamped to the
/// map's far boundary); neighbours outside the grid are skipped. Teleport
/// cells never surface here.
pub fn scan_neighbors(grid: &LayeredGrid, row: i64, col: i64) -> Option<AdjacentAction> {
    NEIGHBOR_ORDER.iter().find_map(|&(dr, dc)| {
        let (r, c) = (row + dr, col + dc);
        if r < 0 || c < 0 {
            return None;
        }
        let (r, c) = (r as usize, c as usize);
        match grid.collision(r, c).ok()? {
            CollisionCell::Action(payload) => Some(AdjacentAction {
                row: r,
                col: c,
                payload: payload.clone(),
            }),
            _ => None,
        }
    })
}

/// [`scan_neighbors`] around the tile under a pixel position
pub fn adjacent_action(grid: &LayeredGrid, pos: Vec2) -> Option<AdjacentAction> {
    let (row, col) = world_to_tile(pos, grid.tile_size());
    scan_neighbors(grid, row as i64, col as i64)
}
