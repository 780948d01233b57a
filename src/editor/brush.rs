use crate::error::GridError;
use crate::layer::Layer;
use crate::tileset::TileAtlas;

/// A drag selection over the atlas grid, kept as the two corner indices.
///
/// The corners may be given in any order; all queries work on the normalised
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasSelection {
    start: u32,
    end: u32,
    columns: u32,
}

impl AtlasSelection {
    /// Selection of the single tile `index` on a sheet with `columns` tiles per row
    pub fn begin(index: u32, columns: u32) -> Self {
        debug_assert!(columns > 0);
        Self {
            start: index,
            end: index,
            columns,
        }
    }

    /// Move the free corner
    pub fn extend(&mut self, index: u32) {
        self.end = index;
    }

    /// Corner where the drag started
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Corner under the pointer
    pub fn end(&self) -> u32 {
        self.end
    }

    /// `(min_row, min_col, max_row, max_col)`, inclusive
    pub fn bounds(&self) -> (u32, u32, u32, u32) {
        let (sr, sc) = (self.start / self.columns, self.start % self.columns);
        let (er, ec) = (self.end / self.columns, self.end % self.columns);
        (sr.min(er), sc.min(ec), sr.max(er), sc.max(ec))
    }

    /// Whether atlas tile `index` lies inside the rectangle
    pub fn contains(&self, index: u32) -> bool {
        let (min_r, min_c, max_r, max_c) = self.bounds();
        let (r, c) = (index / self.columns, index % self.columns);
        (min_r..=max_r).contains(&r) && (min_c..=max_c).contains(&c)
    }
}

/// A rectangular block of tile indices captured from the atlas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brush {
    tiles: Layer<u32>,
}

impl Brush {
    /// Materialise the tiles under `selection`, row-major
    pub fn from_selection(selection: &AtlasSelection, atlas: &TileAtlas) -> Result<Self, GridError> {
        let (min_r, min_c, max_r, max_c) = selection.bounds();
        let rows = (min_r..=max_r)
            .map(|r| (min_c..=max_c).map(|c| atlas.index_at(r, c)).collect())
            .collect::<Result<Vec<Vec<u32>>, _>>()?;
        Ok(Self {
            tiles: Layer::from_rows(rows),
        })
    }

    /// `(rows, cols)`
    pub fn dims(&self) -> (usize, usize) {
        (self.tiles.rows(), self.tiles.cols())
    }

    /// The tile block
    pub fn tiles(&self) -> &Layer<u32> {
        &self.tiles
    }

    /// Top-left tile, for the palette preview
    pub fn first_tile(&self) -> Option<u32> {
        self.tiles.get(0, 0).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas(columns: u32, rows: u32) -> TileAtlas {
        TileAtlas {
            id: "t".into(),
            name: "t".into(),
            src: "t.png".into(),
            tile_width: 32,
            tile_height: 32,
            columns,
            rows,
        }
    }

    #[test]
    fn single_click_is_one_tile_brush() {
        let sel = AtlasSelection::begin(9, 8);
        let brush = Brush::from_selection(&sel, &atlas(8, 8)).unwrap();
        assert_eq!(brush.dims(), (1, 1));
        assert_eq!(brush.first_tile(), Some(9));
    }

    #[test]
    fn bounds_normalise_a_backwards_drag() {
        let mut sel = AtlasSelection::begin(13, 8);
        sel.extend(2);
        // 13 = (1, 5), 2 = (0, 2)
        assert_eq!(sel.bounds(), (0, 2, 1, 5));
        assert!(sel.contains(3));
        assert!(sel.contains(13));
        assert!(!sel.contains(6));
        assert!(!sel.contains(17));
    }

    #[test]
    fn brush_is_row_major() {
        let mut sel = AtlasSelection::begin(1, 4);
        sel.extend(10);
        let brush = Brush::from_selection(&sel, &atlas(4, 4)).unwrap();
        assert_eq!(brush.dims(), (3, 2));
        assert_eq!(brush.tiles().to_rows(), vec![vec![1, 2], vec![5, 6], vec![9, 10]]);
    }

    #[test]
    fn selection_past_the_sheet_fails() {
        let mut sel = AtlasSelection::begin(0, 4);
        sel.extend(17);
        assert!(matches!(
            Brush::from_selection(&sel, &atlas(4, 4)),
            Err(GridError::OutOfRange { .. })
        ));
    }
}
