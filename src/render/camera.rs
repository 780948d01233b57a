//! Camera follow with edge snapping.

use macroquad::prelude::*;

use crate::map::LayeredGrid;

/// Follows the entity with a viewport-sized window clamped to the map.
///
/// Near a map edge (within `margin_tiles` tiles) the camera snaps fully to that
/// edge instead of centring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraController {
    /// Viewport size in pixels
    pub viewport: Vec2,
    /// Dead-zone width, in tiles
    pub margin_tiles: u32,
}

impl CameraController {
    /// Controller for a viewport and dead-zone margin
    pub fn new(viewport: Vec2, margin_tiles: u32) -> Self {
        Self {
            viewport,
            margin_tiles,
        }
    }

    /// Camera offset (top-left of the viewport, map pixels) for an entity at `entity`
    pub fn compute_offset(&self, grid: &LayeredGrid, entity: Vec2) -> Vec2 {
        let map = grid.pixel_size();
        let margin = grid.tile_size() * self.margin_tiles as f32;
        vec2(
            axis_offset(entity.x, map.x, self.viewport.x, margin.x),
            axis_offset(entity.y, map.y, self.viewport.y, margin.y),
        )
    }
}

fn axis_offset(entity: f32, map: f32, view: f32, margin: f32) -> f32 {
    let max = (map - view).max(0.0);
    let mut cam = (entity - view / 2.0).clamp(0.0, max);
    // edge overrides, applied after the centred clamp
    if entity < margin {
        cam = 0.0;
    }
    if entity > map - margin {
        cam = max;
    }
    cam
}
