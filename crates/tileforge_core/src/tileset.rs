//! Tile-set geometry: linear index <-> source row/column

use serde::{Deserialize, Serialize};

/// Converts between a tile's linear index and its row/column in the source
/// tile set, given the set's fixed column count. Row-major indexing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TilesetGeometry {
    pub columns: u32,
}

impl TilesetGeometry {
    pub fn new(columns: u32) -> Self {
        Self { columns }
    }

    /// Linear index of the tile at `(col, row)`.
    pub fn tile_index(&self, col: u32, row: u32) -> u32 {
        row * self.columns + col
    }

    /// `(col, row)` of a linear tile index.
    pub fn coords(&self, index: u32) -> (u32, u32) {
        (index % self.columns, index / self.columns)
    }
}
