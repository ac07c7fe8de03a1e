//! Game-map export and the runtime walkability query
//!
//! The export target is write-only from the engine's perspective: the game
//! runtime reads tile positions and indices, nothing else. Walkability is
//! the one query the character movement machine asks of a loaded map.

use crate::store::{KeyValueStore, StoreError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tileforge_core::{Document, GridPos, Layer};

/// Store key holding the exported map.
pub const GAME_MAP_KEY: &str = "gameMap";

/// The exported document, frozen for consumption by the game runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameMap {
    pub layers: Vec<Layer>,
    pub grid_width: u32,
    pub grid_height: u32,
    pub timestamp: DateTime<Utc>,
}

impl GameMap {
    pub fn from_document(document: &Document) -> Self {
        Self {
            layers: document.layers().to_vec(),
            grid_width: document.grid_width(),
            grid_height: document.grid_height(),
            timestamp: Utc::now(),
        }
    }

    /// Serialize and write the map to the store.
    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StoreError> {
        let payload =
            serde_json::to_string(self).map_err(|e| StoreError::SerializeError(e.to_string()))?;
        store.set(GAME_MAP_KEY, &payload)
    }

    /// Topmost stored tile at a cell, scanning layers top to bottom.
    pub fn tile_at(&self, x: i32, y: i32) -> Option<u32> {
        let pos = GridPos::new(x, y);
        self.layers
            .iter()
            .rev()
            .find_map(|layer| layer.tiles.get(&pos).copied())
    }

    /// Grid-lockstep movement query: cells outside the configured grid are
    /// never walkable; inside it, a cell is walkable unless its topmost
    /// tile is in `non_walkable`. Empty cells are walkable.
    pub fn is_walkable(&self, x: i32, y: i32, non_walkable: &HashSet<u32>) -> bool {
        if x < 0 || y < 0 || x >= self.grid_width as i32 || y >= self.grid_height as i32 {
            return false;
        }
        match self.tile_at(x, y) {
            Some(tile) => !non_walkable.contains(&tile),
            None => true,
        }
    }
}
