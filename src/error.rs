use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::layer::LayerKind;

/// Error type for grid access, atlas addressing and the map document boundary
#[derive(Debug)]
pub enum GridError {
    /// A cell read or write landed outside `[0, rows) x [0, cols)`
    OutOfBounds {
        /// Layer that was addressed
        layer: LayerKind,
        /// Requested row
        row: usize,
        /// Requested column
        col: usize,
        /// Grid row count
        rows: usize,
        /// Grid column count
        cols: usize,
    },
    /// A tile index outside the sheet's `columns * rows` tiles
    OutOfRange {
        /// Requested tile index
        index: u32,
        /// Number of tiles in the sheet
        count: u32,
    },
    /// Grids need at least one row and one column
    EmptyGrid {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
    },
    /// A tile value was written to the collision layer, or a collision value to a tile layer
    LayerMismatch {
        /// Layer that was addressed
        layer: LayerKind,
    },
    /// A layer in a map document does not share the shape of the base layer
    ShapeMismatch {
        /// Offending layer
        layer: LayerKind,
        /// `(rows, cols)` taken from the base layer
        expected: (usize, usize),
        /// `(rows, cols)` found (cols of the first short/long row)
        found: (usize, usize),
    },
    /// A map document must carry exactly three layers
    LayerCount(usize),
    /// The document references a tile sheet id that is not registered
    UnknownAsset(String),
    /// A collision cell code outside 0-4, or a payload object on a kind that carries none
    InvalidCollisionCode {
        /// Row of the cell
        row: usize,
        /// Column of the cell
        col: usize,
        /// Offending code
        code: i64,
    },
    /// A tile layer cell that is neither `null` nor a non-negative integer
    InvalidCell {
        /// Offending layer
        layer: LayerKind,
        /// Row of the cell
        row: usize,
        /// Column of the cell
        col: usize,
    },
    /// A tile layer references an index past the end of the sheet
    TileOutOfRange {
        /// Offending layer
        layer: LayerKind,
        /// Row of the cell
        row: usize,
        /// Column of the cell
        col: usize,
        /// Tile index found
        index: u32,
        /// Number of tiles in the sheet
        count: u32,
    },
    /// JSON parse error, with the file it came from when there is one
    Json {
        /// Source file, if the text was read from disk
        path: Option<PathBuf>,
        /// Underlying parser error
        source: serde_json::Error,
    },
    /// File I/O error
    Io {
        /// File being read or written
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
    /// Unsupported file format (non-JSON)
    UnsupportedFormat(String),
}

impl GridError {
    /// Whether this error was raised by document validation (load is rejected, grid untouched)
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            GridError::ShapeMismatch { .. }
                | GridError::LayerCount(_)
                | GridError::UnknownAsset(_)
                | GridError::InvalidCollisionCode { .. }
                | GridError::InvalidCell { .. }
                | GridError::TileOutOfRange { .. }
                | GridError::EmptyGrid { .. }
        )
    }
}

impl From<serde_json::Error> for GridError {
    fn from(err: serde_json::Error) -> Self {
        GridError::Json {
            path: None,
            source: err,
        }
    }
}

impl From<io::Error> for GridError {
    fn from(err: io::Error) -> Self {
        GridError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::OutOfBounds {
                layer,
                row,
                col,
                rows,
                cols,
            } => write!(
                f,
                "Cell ({}, {}) is outside the {} layer ({} x {})",
                row, col, layer, rows, cols
            ),
            GridError::OutOfRange { index, count } => {
                write!(f, "Tile index {} is outside the sheet ({} tiles)", index, count)
            }
            GridError::EmptyGrid { rows, cols } => {
                write!(f, "Grid must be at least 1 x 1, got {} x {}", rows, cols)
            }
            GridError::LayerMismatch { layer } => {
                write!(f, "Value kind does not belong on the {} layer", layer)
            }
            GridError::ShapeMismatch {
                layer,
                expected,
                found,
            } => write!(
                f,
                "Layer '{}' is {} x {}, expected {} x {}",
                layer, found.0, found.1, expected.0, expected.1
            ),
            GridError::LayerCount(n) => write!(f, "Map document must have 3 layers, found {}", n),
            GridError::UnknownAsset(id) => write!(f, "Unknown tile sheet '{}'", id),
            GridError::InvalidCollisionCode { row, col, code } => {
                write!(f, "Invalid collision code {} at ({}, {})", code, row, col)
            }
            GridError::InvalidCell { layer, row, col } => {
                write!(f, "Invalid tile cell at ({}, {}) on layer '{}'", row, col, layer)
            }
            GridError::TileOutOfRange {
                layer,
                row,
                col,
                index,
                count,
            } => write!(
                f,
                "Tile {} at ({}, {}) on layer '{}' exceeds sheet size {}",
                index, row, col, layer, count
            ),
            GridError::Json { path: Some(p), source } => {
                write!(f, "JSON parse error in {}: {}", p.display(), source)
            }
            GridError::Json { path: None, source } => write!(f, "JSON parse error: {}", source),
            GridError::Io { path, source } => write!(f, "I/O error on {}: {}", path.display(), source),
            GridError::UnsupportedFormat(ext) => write!(f, "Unsupported file format: {}", ext),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::Json { source, .. } => Some(source),
            GridError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
