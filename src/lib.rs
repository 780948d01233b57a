#![warn(missing_docs)]

//! Layered tile-grid world engine for Macroquad: a play viewport with
//! camera-follow movement and collision, and a brush-based level editor.

mod assets;
mod config;
pub mod editor;
mod error;
mod layer;
pub mod loader {
    //! Map document (de)serialisation
    pub mod json_loader;
}
mod map;
pub mod play;
pub mod render;
pub mod spatial;
mod tileset;

pub use assets::LoadedMap;
pub use config::EngineConfig;
pub use editor::{AtlasSelection, Brush, BrushEditor, PaintOutcome, WriteState};
pub use error::GridError;
pub use layer::{CollisionCell, CollisionKind, Layer, LayerKind};
pub use loader::json_loader::{decode_map_file, decode_map_str, encode_map_string, write_map_file, MapDocument};
pub use map::{CellValue, LayeredGrid};
pub use play::{ActionRegistry, InteractionContext, MovementLoop, PlaySession, SelectOutcome};
pub use render::CameraController;
pub use tileset::{AtlasRegistry, TileAtlas};
