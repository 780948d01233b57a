//! Texture loading and layer drawing.

use anyhow::Context;
use macroquad::prelude::*;
use std::path::Path;

use super::cull::{visible_tile_range, TileRange};
use crate::editor::AtlasSelection;
use crate::layer::{CollisionCell, LayerKind};
use crate::map::LayeredGrid;
use crate::spatial::tile_origin;
use crate::tileset::TileAtlas;

const ENTITY_COLOR: Color = Color::new(0.2, 0.8, 0.2, 0.7);
const GRID_LINE: Color = Color::new(0.0, 0.0, 0.0, 0.2);
const SELECTION_LINE: Color = RED;

/// Load a sheet's image with nearest filtering. A leading `/` in `src` is
/// treated as relative to `base_dir`.
pub async fn load_sheet_texture(sheet: &TileAtlas, base_dir: &Path) -> anyhow::Result<Texture2D> {
    let img_path = base_dir.join(sheet.src.trim_start_matches('/'));
    let path_str = img_path
        .to_str()
        .with_context(|| format!("Non UTF-8 texture path for sheet {}", sheet.id))?;
    let tex = load_texture(path_str)
        .await
        .with_context(|| format!("Loading texture {}", sheet.src))?;
    tex.set_filter(FilterMode::Nearest);
    Ok(tex)
}

/// Draw one sheet tile with its top-left at `dest`. Out-of-range indices are
/// logged and skipped.
pub fn draw_tile(tex: &Texture2D, atlas: &TileAtlas, tile: u32, dest: Vec2) {
    match atlas.source_rect_for(tile) {
        Ok(src) => draw_texture_ex(
            tex,
            dest.x,
            dest.y,
            WHITE,
            DrawTextureParams {
                source: Some(src),
                ..Default::default()
            },
        ),
        Err(e) => log::warn!("skipping tile: {}", e),
    }
}

fn draw_tiles(
    grid: &LayeredGrid,
    layer: LayerKind,
    tex: &Texture2D,
    atlas: &TileAtlas,
    range: &TileRange,
    origin: Vec2,
) {
    let Some(tiles) = grid.tile_layer(layer) else {
        return;
    };
    let size = grid.tile_size();
    for (row, col) in range.cells() {
        if let Some(Some(tile)) = tiles.get(row, col) {
            draw_tile(tex, atlas, *tile, origin + tile_origin(row, col, size));
        }
    }
}

/// Play view: base, then the entity, then overlay, all shifted by `-camera`.
pub fn draw_play_view(
    grid: &LayeredGrid,
    tex: &Texture2D,
    atlas: &TileAtlas,
    camera: Vec2,
    viewport: Vec2,
    entity: Vec2,
) {
    let range = visible_tile_range(grid, camera, viewport);
    let origin = -camera;
    draw_tiles(grid, LayerKind::Base, tex, atlas, &range, origin);

    let size = grid.tile_size();
    let e = origin + entity - size / 2.0;
    draw_rectangle(e.x, e.y, size.x, size.y, ENTITY_COLOR);

    draw_tiles(grid, LayerKind::Overlay, tex, atlas, &range, origin);
}

/// Editor view: the whole grid at `origin`, base then overlay then collision labels.
pub fn draw_editor_view(grid: &LayeredGrid, tex: &Texture2D, atlas: &TileAtlas, origin: Vec2) {
    let range = TileRange {
        rows: 0..grid.rows(),
        cols: 0..grid.cols(),
    };
    draw_tiles(grid, LayerKind::Base, tex, atlas, &range, origin);
    draw_tiles(grid, LayerKind::Overlay, tex, atlas, &range, origin);

    let size = grid.tile_size();
    for (row, col, cell) in grid.collision_layer().iter() {
        let p = origin + tile_origin(row, col, size);
        draw_rectangle_lines(p.x, p.y, size.x, size.y, 1.0, GRID_LINE);
        if let Some(label) = cell.label() {
            draw_rectangle(p.x, p.y, size.x, size.y, Color::new(0.0, 0.0, 0.0, 0.1));
            draw_text(&label, p.x + 2.0, p.y + size.y * 0.6, 14.0, label_color(cell));
        }
    }
}

fn label_color(cell: &CollisionCell) -> Color {
    match cell {
        CollisionCell::Blocked => RED,
        CollisionCell::WalkUnder => BLUE,
        CollisionCell::Action(_) => GREEN,
        CollisionCell::Teleport(_) => PURPLE,
        CollisionCell::Walkable => BLANK,
    }
}

/// Tile palette: every sheet tile at `origin` with a `gap`, selected tiles outlined.
pub fn draw_palette(
    atlas: &TileAtlas,
    tex: &Texture2D,
    origin: Vec2,
    gap: f32,
    selection: Option<&AtlasSelection>,
) {
    let (tw, th) = (atlas.tile_width as f32, atlas.tile_height as f32);
    for index in 0..atlas.tile_count() {
        let col = (index % atlas.columns) as f32;
        let row = (index / atlas.columns) as f32;
        let p = origin + vec2(col * (tw + gap), row * (th + gap));
        draw_tile(tex, atlas, index, p);
        if selection.is_some_and(|s| s.contains(index)) {
            draw_rectangle_lines(p.x, p.y, tw, th, 2.0, SELECTION_LINE);
        }
    }
}
