use crate::config::EngineConfig;
use crate::error::GridError;
use crate::layer::{CollisionCell, CollisionKind, LayerKind};
use crate::loader::json_loader::{decode_map_str, encode_map_string};
use crate::map::LayeredGrid;
use crate::tileset::{AtlasRegistry, TileAtlas};

use super::brush::{AtlasSelection, Brush};

/// The collision write workflow for kinds that need a payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WriteState {
    /// No write in flight
    #[default]
    Idle,
    /// `(row, col, kind)` waits for its payload; the grid is untouched
    PendingWrite {
        /// Target row
        row: usize,
        /// Target column
        col: usize,
        /// Action or Teleport
        kind: CollisionKind,
    },
}

/// What a paint did to the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaintOutcome {
    /// A brush was stamped; this many cells landed on the grid
    Stamped(usize),
    /// A simple collision kind was written
    Wrote,
    /// An Action/Teleport write now waits for [`BrushEditor::confirm`]
    Pending,
    /// Nothing happened: no brush, or a write is already pending
    Skipped,
}

/// Editor session over one grid and the current tile sheet
#[derive(Debug, Clone)]
pub struct BrushEditor {
    registry: AtlasRegistry,
    sheet: TileAtlas,
    grid: LayeredGrid,

    active_layer: LayerKind,
    selected_collision: CollisionKind,

    selection: Option<AtlasSelection>,
    selecting: bool,
    brush: Option<Brush>,

    painting: bool,
    write: WriteState,
}

impl BrushEditor {
    /// A fresh `rows x cols` map drawn with the registry's first sheet
    pub fn new(registry: AtlasRegistry, rows: usize, cols: usize) -> Result<Self, GridError> {
        let sheet = registry
            .first()
            .cloned()
            .ok_or_else(|| GridError::UnknownAsset(String::new()))?;
        let grid = LayeredGrid::new(rows, cols, sheet.tile_width, sheet.tile_height)?;
        log::info!("editor opened on sheet '{}'", sheet.id);
        Ok(Self {
            registry,
            sheet,
            grid,
            active_layer: LayerKind::Base,
            selected_collision: CollisionKind::Walkable,
            selection: None,
            selecting: false,
            brush: None,
            painting: false,
            write: WriteState::Idle,
        })
    }

    /// [`BrushEditor::new`] with the configured default map size
    pub fn with_config(registry: AtlasRegistry, cfg: &EngineConfig) -> Result<Self, GridError> {
        Self::new(registry, cfg.default_rows, cfg.default_cols)
    }

    /// The map being edited
    pub fn grid(&self) -> &LayeredGrid {
        &self.grid
    }

    /// Current tile sheet
    pub fn sheet(&self) -> &TileAtlas {
        &self.sheet
    }

    /// Known sheets
    pub fn registry(&self) -> &AtlasRegistry {
        &self.registry
    }

    /// Layer that painting targets
    pub fn active_layer(&self) -> LayerKind {
        self.active_layer
    }

    /// Choose the layer painting targets
    pub fn set_active_layer(&mut self, layer: LayerKind) {
        self.active_layer = layer;
    }

    /// Kind written when painting the collision layer
    pub fn selected_collision(&self) -> CollisionKind {
        self.selected_collision
    }

    /// Choose the collision kind to paint
    pub fn set_selected_collision(&mut self, kind: CollisionKind) {
        self.selected_collision = kind;
    }

    /// Palette selection, possibly still being dragged
    pub fn selection(&self) -> Option<&AtlasSelection> {
        self.selection.as_ref()
    }

    /// Current brush
    pub fn brush(&self) -> Option<&Brush> {
        self.brush.as_ref()
    }

    /// Whether a drag-paint stroke is armed
    pub fn is_painting(&self) -> bool {
        self.painting
    }

    /// Pending collision write, if any
    pub fn write_state(&self) -> &WriteState {
        &self.write
    }

    /// Switch to another registered sheet. Clears the brush and palette selection.
    pub fn select_sheet(&mut self, id: &str) -> Result<(), GridError> {
        let sheet = self
            .registry
            .find(id)
            .cloned()
            .ok_or_else(|| GridError::UnknownAsset(id.to_owned()))?;
        log::info!("sheet switched to '{}'", sheet.id);
        self.sheet = sheet;
        self.clear_brush();
        Ok(())
    }

    fn clear_brush(&mut self) {
        self.brush = None;
        self.selection = None;
        self.selecting = false;
    }

    // === Palette selection ===

    fn check_atlas_index(&self, index: u32) -> Result<(), GridError> {
        if index >= self.sheet.tile_count() {
            return Err(GridError::OutOfRange {
                index,
                count: self.sheet.tile_count(),
            });
        }
        Ok(())
    }

    /// Pointer down on the palette
    pub fn begin_selection(&mut self, index: u32) -> Result<(), GridError> {
        self.check_atlas_index(index)?;
        self.selection = Some(AtlasSelection::begin(index, self.sheet.columns));
        self.selecting = true;
        Ok(())
    }

    /// Pointer moved over palette tile `index` while selecting
    pub fn extend_selection(&mut self, index: u32) -> Result<(), GridError> {
        self.check_atlas_index(index)?;
        if let (true, Some(sel)) = (self.selecting, self.selection.as_mut()) {
            sel.extend(index);
        }
        Ok(())
    }

    /// Pointer up on the palette: materialise the brush from the normalised rectangle
    pub fn end_selection(&mut self) -> Result<Option<&Brush>, GridError> {
        if !self.selecting {
            return Ok(self.brush.as_ref());
        }
        self.selecting = false;
        if let Some(sel) = &self.selection {
            let brush = Brush::from_selection(sel, &self.sheet)?;
            let (rows, cols) = brush.dims();
            log::debug!("brush {}x{} from atlas {}..{}", rows, cols, sel.start(), sel.end());
            self.brush = Some(brush);
        }
        Ok(self.brush.as_ref())
    }

    // === Painting ===

    /// Paint the active layer at `(row, col)`.
    ///
    /// An anchor outside the grid is rejected on every layer. Tile layers
    /// stamp the brush with its top-left at the cell, clipping at the grid edge. Collision cells take the selected kind directly, except
    /// Action/Teleport which enter [`WriteState::PendingWrite`].
    pub fn paint_cell(&mut self, row: usize, col: usize) -> Result<PaintOutcome, GridError> {
        if self.write != WriteState::Idle {
            return Ok(PaintOutcome::Skipped);
        }
        if !self.grid.contains(row, col) {
            // surface the bounds error without touching the grid
            self.grid.get_cell(self.active_layer, row, col)?;
        }
        match self.active_layer {
            LayerKind::Base | LayerKind::Overlay => {
                let Some(brush) = &self.brush else {
                    return Ok(PaintOutcome::Skipped);
                };
                let n = self.grid.paste(self.active_layer, row, col, brush.tiles())?;
                Ok(PaintOutcome::Stamped(n))
            }
            LayerKind::Collision => {
                let kind = self.selected_collision;
                if kind.needs_payload() {
                    log::debug!("pending {:?} write at ({}, {})", kind, row, col);
                    self.write = WriteState::PendingWrite { row, col, kind };
                    self.painting = false;
                    return Ok(PaintOutcome::Pending);
                }
                self.grid.set_collision(row, col, CollisionCell::new(kind, None))?;
                Ok(PaintOutcome::Wrote)
            }
        }
    }

    /// Pointer down on the map: paint and arm the stroke
    pub fn pointer_down(&mut self, row: usize, col: usize) -> Result<PaintOutcome, GridError> {
        self.painting = true;
        self.paint_cell(row, col)
    }

    /// Pointer entered a map cell; repaints while a stroke is armed
    pub fn pointer_enter(&mut self, row: usize, col: usize) -> Result<PaintOutcome, GridError> {
        if !self.painting {
            return Ok(PaintOutcome::Skipped);
        }
        self.paint_cell(row, col)
    }

    /// Pointer released: disarm the stroke
    pub fn pointer_up(&mut self) {
        self.painting = false;
    }

    /// Commit the pending write with its payload. Returns `false` when nothing was pending.
    pub fn confirm(&mut self, payload: impl Into<String>) -> Result<bool, GridError> {
        let WriteState::PendingWrite { row, col, kind } = self.write else {
            return Ok(false);
        };
        let payload = payload.into();
        self.grid
            .set_collision(row, col, CollisionCell::new(kind, Some(payload.clone())))?;
        log::info!("{:?} '{}' written at ({}, {})", kind, payload, row, col);
        self.write = WriteState::Idle;
        Ok(true)
    }

    /// Drop the pending write; the grid is not touched
    pub fn cancel(&mut self) {
        if let WriteState::PendingWrite { row, col, .. } = self.write {
            log::debug!("pending write at ({}, {}) cancelled", row, col);
        }
        self.write = WriteState::Idle;
    }

    // === Map lifecycle ===

    /// Replace the map with an empty `rows x cols` one
    pub fn generate_map(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        let same_geometry =
            (self.grid.tile_width(), self.grid.tile_height()) == (self.sheet.tile_width, self.sheet.tile_height);
        if same_geometry {
            self.grid.resize(rows, cols)?;
        } else {
            self.grid = LayeredGrid::new(rows, cols, self.sheet.tile_width, self.sheet.tile_height)?;
        }
        self.write = WriteState::Idle;
        self.painting = false;
        Ok(())
    }

    /// Load a map document. On any error the current map, sheet and brush are kept.
    pub fn load_document(&mut self, json: &str) -> Result<(), GridError> {
        let (grid, sheet) = decode_map_str(json, &self.registry).map_err(|e| {
            log::warn!("map load rejected: {}", e);
            e
        })?;
        self.grid = grid;
        self.sheet = sheet;
        self.clear_brush();
        self.write = WriteState::Idle;
        self.painting = false;
        Ok(())
    }

    /// Pretty JSON of the current sheet and layers
    pub fn export_document(&self) -> Result<String, GridError> {
        encode_map_string(&self.grid, &self.sheet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> BrushEditor {
        BrushEditor::new(AtlasRegistry::builtin(), 4, 4).unwrap()
    }

    fn select(ed: &mut BrushEditor, start: u32, end: u32) {
        ed.begin_selection(start).unwrap();
        ed.extend_selection(end).unwrap();
        ed.end_selection().unwrap();
    }

    #[test]
    fn tile_layers_need_a_brush() {
        let mut ed = editor();
        assert_eq!(ed.paint_cell(0, 0).unwrap(), PaintOutcome::Skipped);
        assert_eq!(ed.grid().revision(), 0);
    }

    #[test]
    fn stamp_clips_at_grid_edge() {
        let mut ed = editor();
        select(&mut ed, 0, 17);
        assert_eq!(ed.brush().map(Brush::dims), Some((2, 2)));
        ed.set_active_layer(LayerKind::Overlay);
        assert_eq!(ed.paint_cell(3, 2).unwrap(), PaintOutcome::Stamped(2));
        assert_eq!(ed.grid().tile(LayerKind::Overlay, 3, 2).unwrap(), Some(0));
        assert_eq!(ed.grid().tile(LayerKind::Overlay, 3, 3).unwrap(), Some(1));
        assert_eq!(ed.grid().tile(LayerKind::Base, 3, 2).unwrap(), None);
    }

    #[test]
    fn simple_collision_kinds_write_immediately() {
        let mut ed = editor();
        ed.set_active_layer(LayerKind::Collision);
        ed.set_selected_collision(CollisionKind::WalkUnder);
        assert_eq!(ed.paint_cell(1, 1).unwrap(), PaintOutcome::Wrote);
        assert_eq!(ed.grid().collision(1, 1).unwrap(), &CollisionCell::WalkUnder);
        assert!(matches!(ed.paint_cell(4, 0), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn collision_kind_defaults_to_walkable() {
        assert_eq!(editor().selected_collision(), CollisionKind::Walkable);
    }

    #[test]
    fn anchor_off_the_grid_is_rejected_on_tile_layers() {
        let mut ed = editor();
        select(&mut ed, 0, 17);
        let err = ed.paint_cell(10, 10).unwrap_err();
        assert!(matches!(
            err,
            GridError::OutOfBounds {
                layer: LayerKind::Base,
                row: 10,
                col: 10,
                ..
            }
        ));
        assert!(matches!(ed.paint_cell(usize::MAX, 0), Err(GridError::OutOfBounds { .. })));
        assert!(matches!(ed.paint_cell(0, usize::MAX), Err(GridError::OutOfBounds { .. })));
        assert_eq!(ed.grid().revision(), 0);

        ed.set_active_layer(LayerKind::Collision);
        assert!(matches!(ed.paint_cell(10, 10), Err(GridError::OutOfBounds { .. })));
    }

    #[test]
    fn drag_stroke_repaints_until_release() {
        let mut ed = editor();
        ed.set_active_layer(LayerKind::Collision);
        ed.set_selected_collision(CollisionKind::Blocked);
        ed.pointer_down(0, 0).unwrap();
        ed.pointer_enter(0, 1).unwrap();
        ed.pointer_up();
        assert_eq!(ed.pointer_enter(0, 2).unwrap(), PaintOutcome::Skipped);
        assert_eq!(ed.grid().collision(0, 1).unwrap(), &CollisionCell::Blocked);
        assert_eq!(ed.grid().collision(0, 2).unwrap(), &CollisionCell::Walkable);
    }

    #[test]
    fn pending_write_blocks_further_paints() {
        let mut ed = editor();
        ed.set_active_layer(LayerKind::Collision);
        ed.set_selected_collision(CollisionKind::Teleport);
        assert_eq!(ed.pointer_down(2, 2).unwrap(), PaintOutcome::Pending);
        assert!(!ed.is_painting());
        assert_eq!(ed.paint_cell(0, 0).unwrap(), PaintOutcome::Skipped);
        assert!(ed.confirm("cave").unwrap());
        assert_eq!(ed.grid().collision(2, 2).unwrap(), &CollisionCell::Teleport(Some("cave".into())));
        assert!(!ed.confirm("again").unwrap());
    }

    #[test]
    fn switching_sheet_clears_brush() {
        let mut ed = editor();
        select(&mut ed, 3, 3);
        ed.select_sheet("sheet2").unwrap();
        assert!(ed.brush().is_none());
        assert!(ed.selection().is_none());
        assert!(matches!(ed.select_sheet("nope"), Err(GridError::UnknownAsset(_))));
        assert_eq!(ed.sheet().id, "sheet2");
    }

    #[test]
    fn palette_index_past_sheet_is_rejected() {
        let mut ed = editor();
        assert!(ed.begin_selection(256).is_err());
        assert!(ed.selection().is_none());
    }

    #[test]
    fn generate_map_replaces_grid() {
        let mut ed = editor();
        ed.set_active_layer(LayerKind::Collision);
        ed.set_selected_collision(CollisionKind::Blocked);
        ed.paint_cell(0, 0).unwrap();
        ed.generate_map(6, 9).unwrap();
        assert_eq!((ed.grid().rows(), ed.grid().cols()), (6, 9));
        assert_eq!(ed.grid().collision(0, 0).unwrap(), &CollisionCell::Walkable);
    }
}
