use macroquad::prelude::*;

use crate::error::GridError;
use crate::layer::{CollisionCell, Layer, LayerKind};
use crate::spatial::world_to_tile;

/// A value addressed through the layer-generic accessors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    /// Tile index for base/overlay; `None` is the empty sentinel
    Tile(Option<u32>),
    /// Collision cell
    Collision(CollisionCell),
}

/// The map's persistent data: three same-shaped layers plus tile geometry.
///
/// Every mutation bumps [`LayeredGrid::revision`] once, so a brush stamp is a
/// single attributed change no matter how many cells it touches. Equality
/// compares content and geometry, not the revision.
#[derive(Debug, Clone)]
pub struct LayeredGrid {
    tile_w: u32,
    tile_h: u32,
    base: Layer<Option<u32>>,
    overlay: Layer<Option<u32>>,
    collision: Layer<CollisionCell>,
    revision: u64,
}

impl PartialEq for LayeredGrid {
    fn eq(&self, other: &Self) -> bool {
        self.tile_w == other.tile_w
            && self.tile_h == other.tile_h
            && self.base == other.base
            && self.overlay == other.overlay
            && self.collision == other.collision
    }
}

impl Eq for LayeredGrid {}

impl LayeredGrid {
    /// Empty base/overlay, all-walkable collision
    pub fn new(rows: usize, cols: usize, tile_w: u32, tile_h: u32) -> Result<Self, GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid { rows, cols });
        }
        debug_assert!(tile_w > 0 && tile_h > 0);
        log::debug!("creating {}x{} grid ({}x{} px tiles)", rows, cols, tile_w, tile_h);
        Ok(Self {
            tile_w,
            tile_h,
            base: Layer::filled(rows, cols, None),
            overlay: Layer::filled(rows, cols, None),
            collision: Layer::filled(rows, cols, CollisionCell::Walkable),
            revision: 0,
        })
    }

    /// Assemble a grid from already-validated layers
    pub(crate) fn from_layers(
        tile_w: u32,
        tile_h: u32,
        base: Layer<Option<u32>>,
        overlay: Layer<Option<u32>>,
        collision: Layer<CollisionCell>,
    ) -> Self {
        debug_assert_eq!((base.rows(), base.cols()), (overlay.rows(), overlay.cols()));
        debug_assert_eq!((base.rows(), base.cols()), (collision.rows(), collision.cols()));
        Self {
            tile_w,
            tile_h,
            base,
            overlay,
            collision,
            revision: 0,
        }
    }

    /// Replace all layers wholesale with empty ones; old content is not migrated
    pub fn resize(&mut self, rows: usize, cols: usize) -> Result<(), GridError> {
        let fresh = Self::new(rows, cols, self.tile_w, self.tile_h)?;
        let revision = self.revision + 1;
        *self = fresh;
        self.revision = revision;
        log::info!("grid regenerated at {}x{}", rows, cols);
        Ok(())
    }

    /// Row count (shared by all layers)
    #[inline]
    pub fn rows(&self) -> usize {
        self.base.rows()
    }

    /// Column count (shared by all layers)
    #[inline]
    pub fn cols(&self) -> usize {
        self.base.cols()
    }

    /// Tile width in pixels
    #[inline]
    pub fn tile_width(&self) -> u32 {
        self.tile_w
    }

    /// Tile height in pixels
    #[inline]
    pub fn tile_height(&self) -> u32 {
        self.tile_h
    }

    /// Tile size as a vector
    #[inline]
    pub fn tile_size(&self) -> Vec2 {
        vec2(self.tile_w as f32, self.tile_h as f32)
    }

    /// Map extent in pixels
    #[inline]
    pub fn pixel_size(&self) -> Vec2 {
        vec2(
            (self.cols() as u32 * self.tile_w) as f32,
            (self.rows() as u32 * self.tile_h) as f32,
        )
    }

    /// Mutation counter
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether `(row, col)` lies on the grid
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows() && col < self.cols()
    }

    /// Grid cell under a pixel position, `None` off the map
    pub fn tile_at(&self, pos: Vec2) -> Option<(usize, usize)> {
        let (row, col) = world_to_tile(pos, self.tile_size());
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        self.contains(row, col).then_some((row, col))
    }

    /// Base or overlay layer
    pub fn tile_layer(&self, layer: LayerKind) -> Option<&Layer<Option<u32>>> {
        match layer {
            LayerKind::Base => Some(&self.base),
            LayerKind::Overlay => Some(&self.overlay),
            LayerKind::Collision => None,
        }
    }

    /// The collision layer
    pub fn collision_layer(&self) -> &Layer<CollisionCell> {
        &self.collision
    }

    fn out_of_bounds(&self, layer: LayerKind, row: usize, col: usize) -> GridError {
        GridError::OutOfBounds {
            layer,
            row,
            col,
            rows: self.rows(),
            cols: self.cols(),
        }
    }

    fn tile_layer_mut(&mut self, layer: LayerKind) -> Result<&mut Layer<Option<u32>>, GridError> {
        match layer {
            LayerKind::Base => Ok(&mut self.base),
            LayerKind::Overlay => Ok(&mut self.overlay),
            LayerKind::Collision => Err(GridError::LayerMismatch { layer }),
        }
    }

    /// Bounds-checked read of any layer
    pub fn get_cell(&self, layer: LayerKind, row: usize, col: usize) -> Result<CellValue, GridError> {
        match layer {
            LayerKind::Collision => self.collision(row, col).cloned().map(CellValue::Collision),
            _ => self.tile(layer, row, col).map(CellValue::Tile),
        }
    }

    /// Bounds-checked write of any layer; the value kind must match the layer
    pub fn set_cell(
        &mut self,
        layer: LayerKind,
        row: usize,
        col: usize,
        value: CellValue,
    ) -> Result<(), GridError> {
        match (layer, value) {
            (LayerKind::Collision, CellValue::Collision(cell)) => self.set_collision(row, col, cell),
            (LayerKind::Base | LayerKind::Overlay, CellValue::Tile(tile)) => {
                self.set_tile(layer, row, col, tile)
            }
            (layer, _) => Err(GridError::LayerMismatch { layer }),
        }
    }

    /// Tile index on base/overlay
    pub fn tile(&self, layer: LayerKind, row: usize, col: usize) -> Result<Option<u32>, GridError> {
        let l = self.tile_layer(layer).ok_or(GridError::LayerMismatch { layer })?;
        l.get(row, col)
            .copied()
            .ok_or_else(|| self.out_of_bounds(layer, row, col))
    }

    /// Write a tile index (or clear with `None`) on base/overlay
    pub fn set_tile(
        &mut self,
        layer: LayerKind,
        row: usize,
        col: usize,
        tile: Option<u32>,
    ) -> Result<(), GridError> {
        let oob = self.out_of_bounds(layer, row, col);
        let slot = self.tile_layer_mut(layer)?.get_mut(row, col).ok_or(oob)?;
        *slot = tile;
        self.revision += 1;
        Ok(())
    }

    /// Collision cell at `(row, col)`
    pub fn collision(&self, row: usize, col: usize) -> Result<&CollisionCell, GridError> {
        self.collision
            .get(row, col)
            .ok_or_else(|| self.out_of_bounds(LayerKind::Collision, row, col))
    }

    /// Overwrite a collision cell
    pub fn set_collision(&mut self, row: usize, col: usize, cell: CollisionCell) -> Result<(), GridError> {
        let oob = self.out_of_bounds(LayerKind::Collision, row, col);
        let slot = self.collision.get_mut(row, col).ok_or(oob)?;
        *slot = cell;
        self.revision += 1;
        Ok(())
    }

    /// Stamp `block` onto a tile layer with its top-left at `(row, col)`.
    ///
    /// Cells falling outside the grid (including anchors near `usize::MAX`) are
    /// clipped. Returns how many cells were written.
    pub fn paste(
        &mut self,
        layer: LayerKind,
        row: usize,
        col: usize,
        block: &Layer<u32>,
    ) -> Result<usize, GridError> {
        let target = self.tile_layer_mut(layer)?;
        let mut written = 0;
        for (r, c, &tile) in block.iter() {
            let (Some(tr), Some(tc)) = (row.checked_add(r), col.checked_add(c)) else {
                continue;
            };
            if let Some(slot) = target.get_mut(tr, tc) {
                *slot = Some(tile);
                written += 1;
            }
        }
        if written > 0 {
            self.revision += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layer::CollisionKind;

    fn grid(rows: usize, cols: usize) -> LayeredGrid {
        LayeredGrid::new(rows, cols, 32, 32).expect("non-empty grid")
    }

    #[test]
    fn new_grid_is_empty_and_walkable() {
        let g = grid(3, 4);
        assert_eq!((g.rows(), g.cols()), (3, 4));
        assert_eq!(g.pixel_size(), vec2(128.0, 96.0));
        for (_, _, cell) in g.collision_layer().iter() {
            assert_eq!(cell, &CollisionCell::Walkable);
        }
        assert_eq!(g.tile(LayerKind::Base, 2, 3).unwrap(), None);
        assert_eq!(g.tile(LayerKind::Overlay, 0, 0).unwrap(), None);
    }

    #[test]
    fn zero_sized_grid_is_rejected() {
        assert!(matches!(
            LayeredGrid::new(0, 5, 32, 32),
            Err(GridError::EmptyGrid { rows: 0, cols: 5 })
        ));
    }

    #[test]
    fn writes_outside_grid_are_rejected() {
        let mut g = grid(2, 2);
        let err = g.set_tile(LayerKind::Base, 2, 0, Some(1)).unwrap_err();
        assert!(matches!(err, GridError::OutOfBounds { row: 2, col: 0, .. }));
        let err = g.set_collision(0, 2, CollisionCell::Blocked).unwrap_err();
        assert!(matches!(
            err,
            GridError::OutOfBounds {
                layer: LayerKind::Collision,
                ..
            }
        ));
        assert_eq!(g.revision(), 0);
    }

    #[test]
    fn value_kind_must_match_layer() {
        let mut g = grid(2, 2);
        let err = g
            .set_cell(LayerKind::Collision, 0, 0, CellValue::Tile(Some(3)))
            .unwrap_err();
        assert!(matches!(err, GridError::LayerMismatch { .. }));
        let err = g
            .set_cell(LayerKind::Base, 0, 0, CellValue::Collision(CollisionCell::Blocked))
            .unwrap_err();
        assert!(matches!(err, GridError::LayerMismatch { layer: LayerKind::Base }));
    }

    #[test]
    fn generic_accessors_round_trip() {
        let mut g = grid(2, 2);
        let cell = CollisionCell::new(CollisionKind::Action, Some("getWood".into()));
        g.set_cell(LayerKind::Collision, 1, 1, CellValue::Collision(cell.clone()))
            .unwrap();
        g.set_cell(LayerKind::Overlay, 0, 1, CellValue::Tile(Some(7))).unwrap();
        assert_eq!(g.get_cell(LayerKind::Collision, 1, 1).unwrap(), CellValue::Collision(cell));
        assert_eq!(g.get_cell(LayerKind::Overlay, 0, 1).unwrap(), CellValue::Tile(Some(7)));
        assert_eq!(g.revision(), 2);
    }

    #[test]
    fn resize_discards_content() {
        let mut g = grid(2, 2);
        g.set_tile(LayerKind::Base, 0, 0, Some(1)).unwrap();
        g.resize(5, 3).unwrap();
        assert_eq!((g.rows(), g.cols()), (5, 3));
        assert_eq!(g.tile(LayerKind::Base, 0, 0).unwrap(), None);
        assert_eq!(g.tile_width(), 32);
        assert!(g.revision() > 1);
        assert!(g.resize(0, 0).is_err());
        assert_eq!((g.rows(), g.cols()), (5, 3));
    }

    #[test]
    fn paste_clips_at_edges() {
        let mut g = grid(3, 3);
        let block = Layer::from_rows(vec![vec![1, 2], vec![3, 4]]);
        let written = g.paste(LayerKind::Base, 2, 2, &block).unwrap();
        assert_eq!(written, 1);
        assert_eq!(g.tile(LayerKind::Base, 2, 2).unwrap(), Some(1));
        assert_eq!(g.revision(), 1);
        assert!(g.paste(LayerKind::Collision, 0, 0, &block).is_err());
    }

    #[test]
    fn paste_far_off_grid_writes_nothing() {
        let mut g = grid(3, 3);
        let block = Layer::from_rows(vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(g.paste(LayerKind::Overlay, usize::MAX, 0, &block).unwrap(), 0);
        assert_eq!(g.paste(LayerKind::Overlay, 0, usize::MAX, &block).unwrap(), 0);
        assert_eq!(g.paste(LayerKind::Overlay, 10, 10, &block).unwrap(), 0);
        assert_eq!(g.revision(), 0);
    }

    #[test]
    fn tile_at_floors_pixels() {
        let g = grid(2, 3);
        assert_eq!(g.tile_at(vec2(0.0, 0.0)), Some((0, 0)));
        assert_eq!(g.tile_at(vec2(95.9, 63.9)), Some((1, 2)));
        assert_eq!(g.tile_at(vec2(96.0, 0.0)), None);
        assert_eq!(g.tile_at(vec2(-0.1, 0.0)), None);
    }
}
