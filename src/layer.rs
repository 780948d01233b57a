use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the three same-shaped layers composing a map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    /// Ground tiles
    Base,
    /// Tiles drawn above the base
    Overlay,
    /// Passability and interaction data
    Collision,
}

impl LayerKind {
    /// Layer order in the map document (`mapLayers[i]`)
    pub const ALL: [LayerKind; 3] = [LayerKind::Base, LayerKind::Overlay, LayerKind::Collision];

    /// Position of this layer in the document's `mapLayers` array
    pub fn index(self) -> usize {
        match self {
            LayerKind::Base => 0,
            LayerKind::Overlay => 1,
            LayerKind::Collision => 2,
        }
    }

    /// Whether the layer stores tile indices (base/overlay)
    pub fn is_tile_layer(self) -> bool {
        !matches!(self, LayerKind::Collision)
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayerKind::Base => "base",
            LayerKind::Overlay => "overlay",
            LayerKind::Collision => "collision",
        };
        f.write_str(name)
    }
}

/// Collision classification, without payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CollisionKind {
    #[default]
    /// Free to walk on
    Walkable,
    /// Impassable
    Blocked,
    /// Passable, drawn under overlay
    WalkUnder,
    /// Passable, surfaces an interaction prompt when adjacent
    Action,
    /// Passable, carries a teleport target
    Teleport,
}

impl CollisionKind {
    /// Wire code (0-4)
    pub fn code(self) -> u8 {
        match self {
            CollisionKind::Walkable => 0,
            CollisionKind::Blocked => 1,
            CollisionKind::WalkUnder => 2,
            CollisionKind::Action => 3,
            CollisionKind::Teleport => 4,
        }
    }

    /// Inverse of [`CollisionKind::code`]
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CollisionKind::Walkable),
            1 => Some(CollisionKind::Blocked),
            2 => Some(CollisionKind::WalkUnder),
            3 => Some(CollisionKind::Action),
            4 => Some(CollisionKind::Teleport),
            _ => None,
        }
    }

    /// Action and Teleport need a payload string before they can be written
    pub fn needs_payload(self) -> bool {
        matches!(self, CollisionKind::Action | CollisionKind::Teleport)
    }
}

/// A collision cell. Only `Action` and `Teleport` carry a payload.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CollisionCell {
    #[default]
    /// Free to walk on
    Walkable,
    /// Impassable
    Blocked,
    /// Passable, drawn under overlay
    WalkUnder,
    /// Interaction cell; the payload names a handler
    Action(Option<String>),
    /// Teleport cell; the payload names the target
    Teleport(Option<String>),
}

impl CollisionCell {
    /// Build a cell from a kind and an optional payload. The payload is dropped for simple kinds.
    pub fn new(kind: CollisionKind, payload: Option<String>) -> Self {
        match kind {
            CollisionKind::Walkable => CollisionCell::Walkable,
            CollisionKind::Blocked => CollisionCell::Blocked,
            CollisionKind::WalkUnder => CollisionCell::WalkUnder,
            CollisionKind::Action => CollisionCell::Action(payload),
            CollisionKind::Teleport => CollisionCell::Teleport(payload),
        }
    }

    /// The payload-free kind
    pub fn kind(&self) -> CollisionKind {
        match self {
            CollisionCell::Walkable => CollisionKind::Walkable,
            CollisionCell::Blocked => CollisionKind::Blocked,
            CollisionCell::WalkUnder => CollisionKind::WalkUnder,
            CollisionCell::Action(_) => CollisionKind::Action,
            CollisionCell::Teleport(_) => CollisionKind::Teleport,
        }
    }

    /// The handler name / teleport target, if any
    pub fn payload(&self) -> Option<&str> {
        match self {
            CollisionCell::Action(p) | CollisionCell::Teleport(p) => p.as_deref(),
            _ => None,
        }
    }

    /// Everything except `Blocked` can be entered
    #[inline]
    pub fn is_passable(&self) -> bool {
        !matches!(self, CollisionCell::Blocked)
    }

    /// Short editor label: `B`, `U`, `A[:func]`, `T[:func]`; nothing for walkable cells
    pub fn label(&self) -> Option<String> {
        match self {
            CollisionCell::Walkable => None,
            CollisionCell::Blocked => Some("B".to_owned()),
            CollisionCell::WalkUnder => Some("U".to_owned()),
            CollisionCell::Action(p) => Some(tagged_label("A", p)),
            CollisionCell::Teleport(p) => Some(tagged_label("T", p)),
        }
    }
}

fn tagged_label(tag: &str, payload: &Option<String>) -> String {
    match payload.as_deref() {
        Some(p) if !p.is_empty() => format!("{tag}:{p}"),
        _ => tag.to_owned(),
    }
}

/// A dense row-major layer of `rows x cols` cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layer<T> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Clone> Layer<T> {
    /// A layer with every cell set to `fill`
    pub fn filled(rows: usize, cols: usize, fill: T) -> Self {
        Layer {
            rows,
            cols,
            data: vec![fill; rows * cols],
        }
    }

    /// Build from nested rows. Caller guarantees every row has `cols` entries.
    pub(crate) fn from_rows(rows: Vec<Vec<T>>) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        debug_assert!(rows.iter().all(|r| r.len() == n_cols));
        Layer {
            rows: n_rows,
            cols: n_cols,
            data: rows.into_iter().flatten().collect(),
        }
    }

    /// Nested rows, as stored in the map document
    pub fn to_rows(&self) -> Vec<Vec<T>> {
        self.data.chunks(self.cols.max(1)).map(<[T]>::to_vec).collect()
    }
}

impl<T> Layer<T> {
    /// Row count
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Column count
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then(|| row * self.cols + col)
    }

    /// Cell at `(row, col)`, or `None` outside the layer
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<&T> {
        self.idx(row, col).map(|i| &self.data[i])
    }

    /// Mutable cell at `(row, col)`, or `None` outside the layer
    #[inline]
    pub fn get_mut(&mut self, row: usize, col: usize) -> Option<&mut T> {
        self.idx(row, col).map(move |i| &mut self.data[i])
    }

    /// Cells in row-major order with their coordinates
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let cols = self.cols;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, v)| (i / cols, i % cols, v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_kinds_drop_payload() {
        let cell = CollisionCell::new(CollisionKind::Blocked, Some("ignored".into()));
        assert_eq!(cell, CollisionCell::Blocked);
        assert_eq!(cell.payload(), None);
    }

    #[test]
    fn payload_kinds_keep_payload() {
        let cell = CollisionCell::new(CollisionKind::Teleport, Some("cave".into()));
        assert_eq!(cell.kind(), CollisionKind::Teleport);
        assert_eq!(cell.payload(), Some("cave"));
        assert!(cell.is_passable());
    }

    #[test]
    fn codes_round_trip() {
        for code in 0..5 {
            let kind = CollisionKind::from_code(code).expect("valid code");
            assert_eq!(kind.code() as i64, code);
        }
        assert_eq!(CollisionKind::from_code(5), None);
        assert_eq!(CollisionKind::from_code(-1), None);
    }

    #[test]
    fn labels_match_editor_overlay() {
        assert_eq!(CollisionCell::Walkable.label(), None);
        assert_eq!(CollisionCell::Blocked.label().as_deref(), Some("B"));
        assert_eq!(CollisionCell::WalkUnder.label().as_deref(), Some("U"));
        assert_eq!(CollisionCell::Action(None).label().as_deref(), Some("A"));
        assert_eq!(
            CollisionCell::Action(Some("getWood".into())).label().as_deref(),
            Some("A:getWood")
        );
        assert_eq!(CollisionCell::Teleport(Some(String::new())).label().as_deref(), Some("T"));
    }

    #[test]
    fn layer_is_row_major() {
        let layer = Layer::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]);
        assert_eq!(layer.rows(), 2);
        assert_eq!(layer.cols(), 3);
        assert_eq!(layer.get(1, 0), Some(&4));
        assert_eq!(layer.get(2, 0), None);
        assert_eq!(layer.get(0, 3), None);
        assert_eq!(layer.to_rows(), vec![vec![1, 2, 3], vec![4, 5, 6]]);
        let coords: Vec<_> = layer.iter().map(|(r, c, _)| (r, c)).collect();
        assert_eq!(coords[4], (1, 1));
    }
}
