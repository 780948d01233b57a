//! View culling.

use std::ops::Range;

use crate::map::LayeredGrid;
use macroquad::prelude::*;

const CULL_MARGIN_TILES: i32 = 1;

/// Rows and columns of the grid overlapping a view rectangle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileRange {
    /// Visible rows
    pub rows: Range<usize>,
    /// Visible columns
    pub cols: Range<usize>,
}

impl TileRange {
    /// Visible `(row, col)` pairs, row-major
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .clone()
            .flat_map(move |r| self.cols.clone().map(move |c| (r, c)))
    }
}

/// Tiles touched by the view `[camera, camera + viewport]`, padded by one tile
/// and clamped to the grid.
pub fn visible_tile_range(grid: &LayeredGrid, camera: Vec2, viewport: Vec2) -> TileRange {
    let tw = grid.tile_width() as i32;
    let th = grid.tile_height() as i32;
    let view_min = camera;
    let view_max = camera + viewport;

    let mut cx_min = (view_min.x.floor() as i32).div_euclid(tw);
    let mut cy_min = (view_min.y.floor() as i32).div_euclid(th);
    let mut cx_max = (view_max.x.floor() as i32).div_euclid(tw);
    let mut cy_max = (view_max.y.floor() as i32).div_euclid(th);

    if cx_min > cx_max {
        std::mem::swap(&mut cx_min, &mut cx_max);
    }
    if cy_min > cy_max {
        std::mem::swap(&mut cy_min, &mut cy_max);
    }

    cx_min -= CULL_MARGIN_TILES;
    cy_min -= CULL_MARGIN_TILES;
    cx_max += CULL_MARGIN_TILES;
    cy_max += CULL_MARGIN_TILES;

    TileRange {
        rows: clamp_span(cy_min, cy_max, grid.rows()),
        cols: clamp_span(cx_min, cx_max, grid.cols()),
    }
}

fn clamp_span(min: i32, max_inclusive: i32, len: usize) -> Range<usize> {
    let start = min.max(0) as usize;
    let end = ((max_inclusive + 1).max(0) as usize).min(len);
    start.min(end)..end
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_padded_and_clamped() {
        let g = LayeredGrid::new(20, 20, 32, 32).unwrap();
        let r = visible_tile_range(&g, vec2(64.0, 32.0), vec2(96.0, 64.0));
        // view covers cols 2..=5, rows 1..=3; one tile of padding each side
        assert_eq!(r.cols, 1..7);
        assert_eq!(r.rows, 0..5);

        let r = visible_tile_range(&g, Vec2::ZERO, vec2(2000.0, 2000.0));
        assert_eq!(r.cols, 0..20);
        assert_eq!(r.rows, 0..20);
    }

    #[test]
    fn view_off_the_map_is_empty() {
        let g = LayeredGrid::new(4, 4, 32, 32).unwrap();
        let r = visible_tile_range(&g, vec2(1000.0, 1000.0), vec2(100.0, 100.0));
        assert!(r.rows.is_empty());
        assert!(r.cols.is_empty());
        assert_eq!(r.cells().count(), 0);
    }

    #[test]
    fn cells_are_row_major() {
        let g = LayeredGrid::new(4, 4, 32, 32).unwrap();
        let r = TileRange { rows: 1..3, cols: 0..2 };
        let cells: Vec<_> = r.cells().collect();
        assert_eq!(cells, vec![(1, 0), (1, 1), (2, 0), (2, 1)]);
        assert_eq!(visible_tile_range(&g, Vec2::ZERO, vec2(10.0, 10.0)).cells().count(), 4);
    }
}
