use macroquad::prelude::Rect;
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// A tile sheet: image plus the regular grid geometry used to address its tiles.
///
/// Serialized verbatim as the `tileSheet` object of a map document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TileAtlas {
    /// Registry id (`sheet1`, ...)
    pub id: String,
    /// Display name
    pub name: String,
    /// Image URI
    pub src: String,
    /// Tile width in pixels
    pub tile_width: u32,
    /// Tile height in pixels
    pub tile_height: u32,
    /// Tiles per sheet row
    pub columns: u32,
    /// Tile rows in the sheet
    pub rows: u32,
}

impl TileAtlas {
    /// Total number of addressable tiles
    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }

    /// `(row, col)` of a tile in the sheet grid
    pub fn cell_of(&self, tile_index: u32) -> Result<(u32, u32), GridError> {
        self.check(tile_index)?;
        Ok((tile_index / self.columns, tile_index % self.columns))
    }

    /// Tile index at `(row, col)` of the sheet grid
    pub fn index_at(&self, row: u32, col: u32) -> Result<u32, GridError> {
        if row >= self.rows || col >= self.columns {
            return Err(GridError::OutOfRange {
                index: row.saturating_mul(self.columns).saturating_add(col),
                count: self.tile_count(),
            });
        }
        Ok(row * self.columns + col)
    }

    /// Pixel rectangle of `tile_index` inside the sheet image
    pub fn source_rect_for(&self, tile_index: u32) -> Result<Rect, GridError> {
        let (row, col) = self.cell_of(tile_index)?;
        let sx = col * self.tile_width;
        let sy = row * self.tile_height;
        Ok(Rect::new(
            sx as f32,
            sy as f32,
            self.tile_width as f32,
            self.tile_height as f32,
        ))
    }

    fn check(&self, tile_index: u32) -> Result<(), GridError> {
        if tile_index >= self.tile_count() {
            return Err(GridError::OutOfRange {
                index: tile_index,
                count: self.tile_count(),
            });
        }
        Ok(())
    }
}

/// The set of tile sheets a map document may reference
#[derive(Debug, Clone, Default)]
pub struct AtlasRegistry {
    sheets: Vec<TileAtlas>,
}

impl AtlasRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// The two sheets shipped with the editor
    pub fn builtin() -> Self {
        let mut reg = Self::new();
        reg.register(TileAtlas {
            id: "sheet1".into(),
            name: "Reference".into(),
            src: "/assets/tilesheets/reference.png".into(),
            tile_width: 32,
            tile_height: 32,
            columns: 16,
            rows: 16,
        });
        reg.register(TileAtlas {
            id: "sheet2".into(),
            name: "Tile 1".into(),
            src: "/assets/tilesheets/tilesheet1.webp".into(),
            tile_width: 32,
            tile_height: 32,
            columns: 16,
            rows: 16,
        });
        reg
    }

    /// Add or replace a sheet (keyed by id)
    pub fn register(&mut self, sheet: TileAtlas) {
        debug_assert!(sheet.tile_width > 0 && sheet.tile_height > 0);
        debug_assert!(sheet.columns > 0 && sheet.rows > 0);
        match self.sheets.iter_mut().find(|s| s.id == sheet.id) {
            Some(slot) => *slot = sheet,
            None => self.sheets.push(sheet),
        }
    }

    /// Sheet registered under `id`
    pub fn find(&self, id: &str) -> Option<&TileAtlas> {
        self.sheets.iter().find(|s| s.id == id)
    }

    /// Registered sheets, in registration order
    pub fn sheets(&self) -> &[TileAtlas] {
        &self.sheets
    }

    /// First registered sheet, the editor's default
    pub fn first(&self) -> Option<&TileAtlas> {
        self.sheets.first()
    }
}
