use macroquad::prelude::*;

use crate::map::LayeredGrid;

/// Whether the tile under `pos` may be occupied.
///
/// Off-grid positions count as blocked. Only `Blocked` cells stop movement;
/// `Action` and `Teleport` are passable terrain.
pub fn can_enter(grid: &LayeredGrid, pos: Vec2) -> bool {
    match grid.tile_at(pos) {
        Some((row, col)) => grid
            .collision(row, col)
            .map(|cell| cell.is_passable())
            .unwrap_or(false),
        None => false,
    }
}

/// Outcome of one axis-separated step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisStep {
    /// Position after the step
    pub pos: Vec2,
    /// The x candidate was rejected
    pub blocked_x: bool,
    /// The y candidate was rejected
    pub blocked_y: bool,
}

/// Move `pos` by `delta`, resolving each axis on its own.
///
/// The x candidate is tested at the old y, the y candidate at the
/// old x, so a diagonal push into a wall slides along the open axis.
/// Accepted coordinates are clamped to the map's pixel extent.
pub fn resolve_step(grid: &LayeredGrid, pos: Vec2, delta: Vec2) -> AxisStep {
    let extent = grid.pixel_size();
    let mut out = pos;

    let next_x = pos.x + delta.x;
    let blocked_x = !can_enter(grid, vec2(next_x, pos.y));
    if !blocked_x {
        out.x = next_x.clamp(0.0, extent.x);
    }

    let next_y = pos.y + delta.y;
    let blocked_y = !can_enter(grid, vec2(pos.x, next_y));
    if !blocked_y {
        out.y = next_y.clamp(0.0, extent.y);
    }

    AxisStep {
        pos: out,
        blocked_x,
        blocked_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::CollisionCell;

    fn grid() -> LayeredGrid {
        let mut g = LayeredGrid::new(4, 4, 32, 32).unwrap();
        g.set_collision(1, 1, CollisionCell::Blocked).unwrap();
        g.set_collision(1, 2, CollisionCell::WalkUnder).unwrap();
        g.set_collision(2, 1, CollisionCell::Action(Some("getWood".into()))).unwrap();
        g.set_collision(2, 2, CollisionCell::Teleport(None)).unwrap();
        g
    }

    #[test]
    fn only_blocked_and_off_grid_refuse_entry() {
        let g = grid();
        assert!(can_enter(&g, vec2(16.0, 16.0)));
        assert!(!can_enter(&g, vec2(48.0, 48.0)));
        assert!(can_enter(&g, vec2(80.0, 48.0)));
        assert!(can_enter(&g, vec2(48.0, 80.0)));
        assert!(can_enter(&g, vec2(80.0, 80.0)));
        assert!(!can_enter(&g, vec2(-1.0, 16.0)));
        assert!(!can_enter(&g, vec2(16.0, 128.0)));
    }

    #[test]
    fn diagonal_into_wall_slides() {
        let g = grid();
        // just left of the blocked tile (1,1), in row 1
        let start = vec2(31.0, 40.0);
        let step = resolve_step(&g, start, vec2(2.0, 2.0));
        assert!(step.blocked_x);
        assert!(!step.blocked_y);
        assert_eq!(step.pos, vec2(31.0, 42.0));
    }

    #[test]
    fn y_candidate_uses_old_x() {
        let g = grid();
        // moving right would leave the blocked column, but y is tested at the old x
        let start = vec2(40.0, 31.0);
        let step = resolve_step(&g, start, vec2(30.0, 2.0));
        assert!(!step.blocked_x);
        assert!(step.blocked_y);
        assert_eq!(step.pos, vec2(70.0, 31.0));
    }

    #[test]
    fn zero_delta_keeps_position() {
        let g = grid();
        let step = resolve_step(&g, vec2(10.0, 10.0), Vec2::ZERO);
        assert_eq!(step.pos, vec2(10.0, 10.0));
    }
}
