//! Camera, culling and drawing of the layered grid.

pub mod camera;
pub mod cull;
pub mod draw;

pub use camera::CameraController;
pub use cull::{visible_tile_range, TileRange};
