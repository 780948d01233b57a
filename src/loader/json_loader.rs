//! The persisted map document: `tileSheet` plus `mapLayers`.

use crate::error::GridError;
use crate::layer::{CollisionCell, CollisionKind, Layer, LayerKind};
use crate::map::LayeredGrid;
use crate::tileset::{AtlasRegistry, TileAtlas};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One cell of `mapLayers`, as it appears on the wire.
///
/// Tile layers hold `int | null`; the collision layer holds
/// `int (0-4) | {code: 3|4, func: string}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonCell {
    /// Bare integer: tile index or collision code
    Code(i64),
    /// Collision cell with a payload
    Tagged {
        /// Collision code
        code: i64,
        /// Handler / teleport target name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        func: Option<String>,
    },
}

type JsonLayer = Vec<Vec<Option<JsonCell>>>;

/// The persisted map document: sheet metadata plus `[base, overlay, collision]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapDocument {
    /// Sheet the tile layers index into
    pub tile_sheet: TileAtlas,
    /// `[base, overlay, collision]`
    pub map_layers: Vec<JsonLayer>,
}

fn collision_to_json(cell: &CollisionCell) -> JsonCell {
    let code = cell.kind().code() as i64;
    match cell.payload() {
        Some(func) => JsonCell::Tagged {
            code,
            func: Some(func.to_owned()),
        },
        None => JsonCell::Code(code),
    }
}

fn collision_from_json(cell: Option<JsonCell>, row: usize, col: usize) -> Result<CollisionCell, GridError> {
    let invalid = |code| GridError::InvalidCollisionCode { row, col, code };
    match cell {
        // an unset collision cell reads as walkable
        None => Ok(CollisionCell::Walkable),
        Some(JsonCell::Code(code)) => {
            let kind = CollisionKind::from_code(code).ok_or_else(|| invalid(code))?;
            Ok(CollisionCell::new(kind, None))
        }
        Some(JsonCell::Tagged { code, func }) => match CollisionKind::from_code(code) {
            Some(kind) if kind.needs_payload() => Ok(CollisionCell::new(kind, func)),
            _ => Err(invalid(code)),
        },
    }
}

fn tile_from_json(
    cell: Option<JsonCell>,
    layer: LayerKind,
    row: usize,
    col: usize,
    count: u32,
) -> Result<Option<u32>, GridError> {
    match cell {
        None => Ok(None),
        Some(JsonCell::Code(idx)) if idx >= 0 => {
            let index = u32::try_from(idx).map_err(|_| GridError::InvalidCell { layer, row, col })?;
            if index >= count {
                return Err(GridError::TileOutOfRange {
                    layer,
                    row,
                    col,
                    index,
                    count,
                });
            }
            Ok(Some(index))
        }
        Some(_) => Err(GridError::InvalidCell { layer, row, col }),
    }
}

fn check_shape(layer: LayerKind, data: &JsonLayer, rows: usize, cols: usize) -> Result<(), GridError> {
    let mismatch = |found| GridError::ShapeMismatch {
        layer,
        expected: (rows, cols),
        found,
    };
    if data.len() != rows {
        return Err(mismatch((data.len(), data.first().map_or(0, Vec::len))));
    }
    if let Some(bad) = data.iter().find(|r| r.len() != cols) {
        return Err(mismatch((rows, bad.len())));
    }
    Ok(())
}

/// Build the document for `grid` drawn with `sheet`
pub fn encode_document(grid: &LayeredGrid, sheet: &TileAtlas) -> MapDocument {
    let tiles = |layer: LayerKind| -> JsonLayer {
        grid.tile_layer(layer)
            .map(|l| {
                l.to_rows()
                    .into_iter()
                    .map(|row| row.into_iter().map(|t| t.map(|i| JsonCell::Code(i as i64))).collect())
                    .collect()
            })
            .unwrap_or_default()
    };
    let collision = grid
        .collision_layer()
        .to_rows()
        .iter()
        .map(|row| row.iter().map(|c| Some(collision_to_json(c))).collect())
        .collect();

    MapDocument {
        tile_sheet: sheet.clone(),
        map_layers: vec![tiles(LayerKind::Base), tiles(LayerKind::Overlay), collision],
    }
}

/// Validate a document against `registry` and build the grid.
///
/// The sheet is resolved through the registry (its geometry wins over the
/// document's copy). `mapLayers[0]` defines the authoritative shape; all three
/// layers must match it.
pub fn decode_document(
    doc: MapDocument,
    registry: &AtlasRegistry,
) -> Result<(LayeredGrid, TileAtlas), GridError> {
    let sheet = registry
        .find(&doc.tile_sheet.id)
        .cloned()
        .ok_or_else(|| GridError::UnknownAsset(doc.tile_sheet.id.clone()))?;

    if doc.map_layers.len() != LayerKind::ALL.len() {
        return Err(GridError::LayerCount(doc.map_layers.len()));
    }

    let rows = doc.map_layers[0].len();
    let cols = doc.map_layers[0].first().map_or(0, Vec::len);
    if rows == 0 || cols == 0 {
        return Err(GridError::EmptyGrid { rows, cols });
    }
    for (layer, data) in LayerKind::ALL.iter().zip(&doc.map_layers) {
        check_shape(*layer, data, rows, cols)?;
    }

    let mut layers = doc.map_layers.into_iter();
    let mut next_tiles = |layer: LayerKind| -> Result<Layer<Option<u32>>, GridError> {
        let data = layers.next().unwrap_or_default();
        let rows = data
            .into_iter()
            .enumerate()
            .map(|(r, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(c, cell)| tile_from_json(cell, layer, r, c, sheet.tile_count()))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Layer::from_rows(rows))
    };
    let base = next_tiles(LayerKind::Base)?;
    let overlay = next_tiles(LayerKind::Overlay)?;
    let collision_rows = layers
        .next()
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(r, row)| {
            row.into_iter()
                .enumerate()
                .map(|(c, cell)| collision_from_json(cell, r, c))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;
    let collision = Layer::from_rows(collision_rows);

    log::info!("decoded {}x{} map on sheet '{}'", rows, cols, sheet.id);
    let grid = LayeredGrid::from_layers(sheet.tile_width, sheet.tile_height, base, overlay, collision);
    Ok((grid, sheet))
}

/// Parse and validate map JSON text
pub fn decode_map_str(json: &str, registry: &AtlasRegistry) -> Result<(LayeredGrid, TileAtlas), GridError> {
    let doc: MapDocument = serde_json::from_str(json)?;
    decode_document(doc, registry)
}

/// Read, parse and validate a `.json` map file
pub fn decode_map_file<P: AsRef<Path>>(
    path: P,
    registry: &AtlasRegistry,
) -> Result<(LayeredGrid, TileAtlas), GridError> {
    let p = path.as_ref();
    if p.extension().and_then(|e| e.to_str()) != Some("json") {
        return Err(GridError::UnsupportedFormat(p.display().to_string()));
    }

    let txt = std::fs::read_to_string(p).map_err(|source| GridError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    let doc: MapDocument = serde_json::from_str(&txt).map_err(|source| GridError::Json {
        path: Some(p.to_path_buf()),
        source,
    })?;
    decode_document(doc, registry)
}

/// Pretty JSON export of `grid` and `sheet`
pub fn encode_map_string(grid: &LayeredGrid, sheet: &TileAtlas) -> Result<String, GridError> {
    Ok(serde_json::to_string_pretty(&encode_document(grid, sheet))?)
}

/// Write the export to a file
pub fn write_map_file<P: AsRef<Path>>(path: P, grid: &LayeredGrid, sheet: &TileAtlas) -> Result<(), GridError> {
    let p = path.as_ref();
    let txt = encode_map_string(grid, sheet)?;
    std::fs::write(p, txt).map_err(|source| GridError::Io {
        path: p.to_path_buf(),
        source,
    })?;
    log::info!("map exported to {}", p.display());
    Ok(())
}

impl LayeredGrid {
    /// Serializable form of this grid drawn with `sheet`
    pub fn to_serializable(&self, sheet: &TileAtlas) -> MapDocument {
        encode_document(self, sheet)
    }

    /// Build a grid from a document; see [`decode_document`]
    pub fn from_serializable(
        doc: MapDocument,
        registry: &AtlasRegistry,
    ) -> Result<(LayeredGrid, TileAtlas), GridError> {
        decode_document(doc, registry)
    }
}
