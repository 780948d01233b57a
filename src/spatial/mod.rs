//! Pixel-to-tile conversion, passability and neighbour queries.

mod adjacency;
mod collision;

pub use adjacency::{adjacent_action, scan_neighbors, AdjacentAction, NEIGHBOR_ORDER};
pub use collision::{can_enter, resolve_step, AxisStep};

use macroquad::prelude::*;

/// `(row, col)` of the tile under `p`, floored; may be negative or past the grid
#[inline]
pub fn world_to_tile(p: Vec2, tile: Vec2) -> (i32, i32) {
    ((p.y / tile.y).floor() as i32, (p.x / tile.x).floor() as i32)
}

/// Top-left pixel of a tile
#[inline]
pub fn tile_origin(row: usize, col: usize, tile: Vec2) -> Vec2 {
    vec2(col as f32 * tile.x, row as f32 * tile.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn world_to_tile_floors_negative_positions() {
        let tile = vec2(32.0, 16.0);
        assert_eq!(world_to_tile(vec2(0.0, 0.0), tile), (0, 0));
        assert_eq!(world_to_tile(vec2(31.9, 16.0), tile), (1, 0));
        assert_eq!(world_to_tile(vec2(-0.5, -0.5), tile), (-1, -1));
    }

    #[test]
    fn tile_origin_is_col_major_in_x() {
        assert_eq!(tile_origin(2, 3, vec2(32.0, 16.0)), vec2(96.0, 32.0));
    }
}
