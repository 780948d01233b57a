//! Level editor state: palette selection, brush stamping and collision authoring.

mod brush;
mod session;

pub use brush::{AtlasSelection, Brush};
pub use session::{BrushEditor, PaintOutcome, WriteState};
