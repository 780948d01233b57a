use anyhow::Context;
use macroquad::prelude::*;
use std::path::Path;

use crate::loader::json_loader::decode_map_file;
use crate::map::LayeredGrid;
use crate::render::draw::load_sheet_texture;
use crate::tileset::{AtlasRegistry, TileAtlas};

/// A decoded map together with its sheet texture, ready to draw
pub struct LoadedMap {
    /// Map layers
    pub grid: LayeredGrid,
    /// Sheet geometry from the registry
    pub sheet: TileAtlas,
    /// Sheet image
    pub texture: Texture2D,
}

impl LoadedMap {
    /// Load a map document and its sheet image. Sheet `src` paths resolve against `asset_root`.
    pub async fn load(path: &str, registry: &AtlasRegistry, asset_root: &Path) -> anyhow::Result<Self> {
        let (grid, sheet) =
            decode_map_file(path, registry).with_context(|| format!("Loading map file {}", path))?;
        let texture = load_sheet_texture(&sheet, asset_root).await?;
        Ok(Self { grid, sheet, texture })
    }
}
