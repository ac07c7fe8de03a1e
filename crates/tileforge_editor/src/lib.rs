//! The tileforge editing engine
//!
//! [`MapEditor`] is the façade external callers drive: it owns the
//! authoritative [`Document`], routes tool commands into layer mutation,
//! the fill engine, and terrain resolution, and snapshots the document into
//! history at stroke boundaries. The renderer and UI live elsewhere; they
//! see grid coordinates, tile indices, and nothing of this crate's
//! persistence.
//!
//! Everything the editor touches is passed in explicitly - the store handle
//! goes into [`MapEditor::new`], and no state hides in globals.

pub mod export;
pub mod history;
pub mod store;
pub mod tools;
pub mod zones;

pub use export::{GameMap, GAME_MAP_KEY};
pub use history::{HistoryEntry, HistoryManager, DEFAULT_MAX_ENTRIES, HISTORY_KEY};
pub use store::{DirStore, KeyValueStore, MemoryStore, StoreError};
pub use tools::flood_fill;
pub use zones::{Zone, ZoneBounds, ZoneCategory, ZoneRegistry, ZONES_KEY};

pub use tileforge_core::{
    Document, GridPos, Layer, TilesetGeometry, Viewport, BACKGROUND_LAYER, BACKGROUND_NAME,
};

use tileforge_autotile::TerrainStroke;
use uuid::Uuid;

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tool {
    #[default]
    Brush,
    Eraser,
    Fill,
}

/// A terrain stroke in progress: the source zone plus the marker set.
struct TerrainPaint {
    zone_id: Uuid,
    stroke: TerrainStroke,
}

/// The editing façade: owns the live document and orchestrates tools,
/// history, and zones over one key-value store.
pub struct MapEditor<S: KeyValueStore> {
    store: S,
    document: Document,
    history: HistoryManager,
    zones: ZoneRegistry,
    tileset: TilesetGeometry,
    terrain: Option<TerrainPaint>,
    pub tool: Tool,
    pub brush_size: u32,
}

impl<S: KeyValueStore> MapEditor<S> {
    /// Open an editor over `store`, restoring the current history snapshot
    /// and the zone list when present. A fresh store yields an empty
    /// document of the given grid size.
    pub fn new(store: S, grid_width: u32, grid_height: u32, tileset: TilesetGeometry) -> Self {
        let history = HistoryManager::load(&store, DEFAULT_MAX_ENTRIES);
        let zones = ZoneRegistry::load(&store);
        let document = history
            .current_document()
            .unwrap_or_else(|| Document::new(grid_width, grid_height));
        Self {
            store,
            document,
            history,
            zones,
            tileset,
            terrain: None,
            tool: Tool::default(),
            brush_size: 1,
        }
    }

    /// The authoritative document, read-only. Renderers walk its layers
    /// once per frame.
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn zones(&self) -> &ZoneRegistry {
        &self.zones
    }

    pub fn tileset(&self) -> TilesetGeometry {
        self.tileset
    }

    // --- Basic tools ---

    /// Apply the active tool at grid coordinates. Brush and fill need a
    /// selected tile and do nothing without one; the eraser never does.
    pub fn apply_tool(&mut self, x: i32, y: i32, selected_tile: Option<u32>, viewport: &Viewport) {
        match self.tool {
            Tool::Brush => {
                if let Some(tile) = selected_tile {
                    self.document.brush(x, y, tile, self.brush_size);
                }
            }
            Tool::Eraser => self.document.remove_tile(x, y),
            Tool::Fill => {
                if let Some(tile) = selected_tile {
                    tools::flood_fill(&mut self.document, x, y, tile, viewport);
                }
            }
        }
    }

    /// Stroke boundary (mouse-up analog): snapshot the document.
    pub fn end_stroke(&mut self, label: &str) {
        self.history.snapshot(&mut self.store, &self.document, label);
    }

    // --- Layer commands ---

    pub fn add_layer(&mut self, name: Option<&str>) -> usize {
        let index = self.document.add_layer(name);
        self.history
            .snapshot(&mut self.store, &self.document, "Add layer");
        index
    }

    pub fn set_active_layer(&mut self, index: usize) {
        self.document.set_active_layer(index);
    }

    pub fn rename_layer(&mut self, index: usize, name: &str) {
        self.document.rename_layer(index, name);
        self.history
            .snapshot(&mut self.store, &self.document, "Rename layer");
    }

    pub fn reorder_layer(&mut self, from: usize, to: usize) {
        self.document.reorder_layer(from, to);
        self.history
            .snapshot(&mut self.store, &self.document, "Reorder layers");
    }

    pub fn delete_layer(&mut self, index: usize) {
        self.document.delete_layer(index);
        self.history
            .snapshot(&mut self.store, &self.document, "Delete layer");
    }

    pub fn toggle_layer_visibility(&mut self, index: usize) {
        self.document.toggle_layer_visibility(index);
    }

    pub fn clear_active_layer(&mut self) {
        self.document.clear_active_layer();
        self.history
            .snapshot(&mut self.store, &self.document, "Clear layer");
    }

    // --- History ---

    pub fn undo(&mut self) {
        if let Some(document) = self.history.undo(&mut self.store) {
            self.document = document;
        }
    }

    pub fn redo(&mut self) {
        if let Some(document) = self.history.redo(&mut self.store) {
            self.document = document;
        }
    }

    /// Jump to an arbitrary history entry.
    pub fn navigate_to_history(&mut self, index: usize) {
        if let Some(document) = self.history.navigate_to(&mut self.store, index) {
            self.document = document;
        }
    }

    // --- Zones ---

    pub fn create_zone(
        &mut self,
        p1: (i32, i32),
        p2: (i32, i32),
        name: &str,
        category: ZoneCategory,
    ) -> Uuid {
        self.zones
            .create_zone(&mut self.store, p1, p2, name, category)
            .id
    }

    pub fn begin_zone(&mut self, p1: (i32, i32)) {
        self.zones.begin(p1);
    }

    pub fn update_zone(&mut self, p: (i32, i32)) {
        self.zones.update(p);
    }

    pub fn finish_zone(&mut self, name: &str, category: ZoneCategory) -> Option<Uuid> {
        self.zones
            .finish(&mut self.store, name, category)
            .map(|z| z.id)
    }

    pub fn cancel_zone(&mut self) {
        self.zones.cancel();
    }

    pub fn delete_zone(&mut self, id: Uuid) -> bool {
        self.zones.delete_zone(&mut self.store, id)
    }

    pub fn rename_zone(&mut self, id: Uuid, name: &str) -> bool {
        self.zones.rename_zone(&mut self.store, id, name)
    }

    pub fn select_zone(&mut self, id: Uuid) {
        self.zones.select(id);
    }

    pub fn deselect_zone(&mut self) {
        self.zones.deselect();
    }

    /// Stamp a zone's source block onto the active layer with its top-left
    /// corner at `(x, y)`. `false` for an unknown zone.
    pub fn stamp_zone(&mut self, id: Uuid, x: i32, y: i32) -> bool {
        let Some(zone) = self.zones.zone(id) else {
            return false;
        };
        let bounds = zone.bounds;
        for dy in 0..bounds.height {
            for dx in 0..bounds.width {
                let col = bounds.start_x + dx;
                let row = bounds.start_y + dy;
                if col < 0 || row < 0 {
                    continue;
                }
                let tile = self.tileset.tile_index(col as u32, row as u32);
                self.document.set_tile(x + dx, y + dy, tile);
            }
        }
        true
    }

    // --- Terrain strokes ---

    /// Start painting terrain from a path or water zone. `false` when the
    /// zone is missing or not a terrain category.
    pub fn begin_terrain_stroke(&mut self, zone_id: Uuid) -> bool {
        let is_terrain = self
            .zones
            .zone(zone_id)
            .is_some_and(|z| z.category.is_terrain());
        if is_terrain {
            self.terrain = Some(TerrainPaint {
                zone_id,
                stroke: TerrainStroke::new(),
            });
        }
        is_terrain
    }

    /// Extend the stroke over `(x, y)`: mark the cell, then re-resolve it
    /// and its 8 neighbors against the pre-call state and write the
    /// resolved transition tiles. A single click is one `begin`, one
    /// `continue`, one `finish`.
    pub fn continue_terrain_stroke(&mut self, x: i32, y: i32) {
        match self.terrain.as_mut() {
            Some(paint) => paint.stroke.mark(x, y),
            None => return,
        }
        let Some(paint) = self.terrain.as_ref() else {
            return;
        };
        let Some(zone) = self.zones.zone(paint.zone_id) else {
            return;
        };
        let bounds = zone.bounds;
        let tileset = self.tileset;

        let document = &self.document;
        let stroke = &paint.stroke;
        let painted =
            |px: i32, py: i32| stroke.is_marked(px, py) || document.get_tile(px, py).is_some();

        let mut writes = Vec::new();
        for dy in -1..=1 {
            for dx in -1..=1 {
                let (cx, cy) = (x + dx, y + dy);
                if let Some(slot) = tileforge_autotile::resolve_at(cx, cy, &painted) {
                    if let Some(tile) = terrain_tile(&bounds, tileset, slot) {
                        writes.push((cx, cy, tile));
                    }
                }
            }
        }

        for (cx, cy, tile) in writes {
            self.document.set_tile(cx, cy, tile);
        }
    }

    /// End the stroke: drop the marker set and snapshot.
    pub fn finish_terrain_stroke(&mut self) {
        if let Some(paint) = self.terrain.take() {
            let label = match self.zones.zone(paint.zone_id) {
                Some(zone) => format!("Paint {}", zone.name),
                None => "Paint terrain".to_string(),
            };
            self.history
                .snapshot(&mut self.store, &self.document, &label);
        }
    }

    /// Drop the marker set without a snapshot. Tiles already written during
    /// the stroke stay on the layer; undo covers them via the previous
    /// snapshot.
    pub fn cancel_terrain_stroke(&mut self) {
        self.terrain = None;
    }

    // --- Export ---

    /// Freeze the document into the game-map payload and write it to the
    /// store.
    pub fn export_game_map(&mut self) -> Result<GameMap, StoreError> {
        let map = GameMap::from_document(&self.document);
        map.save(&mut self.store)?;
        Ok(map)
    }
}

/// Tile index of a slot inside a zone's transition block. `None` when the
/// slot lands outside the source tile set.
fn terrain_tile(bounds: &ZoneBounds, tileset: TilesetGeometry, slot: u8) -> Option<u32> {
    let (col_off, row_off) = tileforge_autotile::slot_offset(slot);
    let col = bounds.start_x + col_off as i32;
    let row = bounds.start_y + row_off as i32;
    if col < 0 || row < 0 {
        return None;
    }
    Some(tileset.tile_index(col as u32, row as u32))
}
