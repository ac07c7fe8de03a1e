//! Layer type: a named sparse mapping from grid cell to tile index

use crate::GridPos;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Index of the background layer. It is always present and cannot be
/// deleted, renamed, reordered, or hidden.
pub const BACKGROUND_LAYER: usize = 0;

/// Name of the background layer.
pub const BACKGROUND_NAME: &str = "Background";

/// A single paint surface among several composited bottom-to-top.
///
/// Tiles are stored sparsely; absence of a key is the "empty" state,
/// distinct from tile index 0 which is a valid tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub tiles: HashMap<GridPos, u32>,
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// Create an empty, visible layer.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tiles: HashMap::new(),
            visible: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}
