//! The authoritative map document: ordered layers plus the active-layer pointer

use crate::{GridPos, Layer, BACKGROUND_LAYER, BACKGROUND_NAME};
use serde::{Deserialize, Serialize};

/// The authoritative, mutable map state.
///
/// Layer 0 is the background: always present and exempt from deletion,
/// renaming, reordering, and visibility toggling. All tile mutation goes
/// through the active layer. Operations given an out-of-range index are
/// silent no-ops; layer panels fire commands against indices that may have
/// just gone stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    layers: Vec<Layer>,
    active_layer: usize,
    grid_width: u32,
    grid_height: u32,
}

impl Document {
    /// Create a document holding only the background layer.
    pub fn new(grid_width: u32, grid_height: u32) -> Self {
        Self {
            layers: vec![Layer::new(BACKGROUND_NAME)],
            active_layer: BACKGROUND_LAYER,
            grid_width,
            grid_height,
        }
    }

    pub fn grid_width(&self) -> u32 {
        self.grid_width
    }

    pub fn grid_height(&self) -> u32 {
        self.grid_height
    }

    /// All layers, bottom (index 0) to top.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    /// Append an empty layer and make it active. Returns its index.
    pub fn add_layer(&mut self, name: Option<&str>) -> usize {
        let name = match name {
            Some(name) => name.to_string(),
            None => format!("Layer {}", self.layers.len()),
        };
        self.layers.push(Layer::new(name));
        self.active_layer = self.layers.len() - 1;
        self.active_layer
    }

    pub fn set_active_layer(&mut self, index: usize) {
        if index < self.layers.len() {
            self.active_layer = index;
        }
    }

    /// Rename a layer. The background keeps its name; blank names are
    /// ignored, everything else is trimmed.
    pub fn rename_layer(&mut self, index: usize, name: &str) {
        if index == BACKGROUND_LAYER {
            return;
        }
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return;
        }
        if let Some(layer) = self.layers.get_mut(index) {
            layer.name = trimmed.to_string();
        }
    }

    /// Move a layer to a new position in the stack. Remove-and-reinsert
    /// semantics: layers between the endpoints shift by one. A no-op when
    /// either endpoint is the background or out of range.
    pub fn reorder_layer(&mut self, from: usize, to: usize) {
        if from == BACKGROUND_LAYER || to == BACKGROUND_LAYER {
            return;
        }
        if from >= self.layers.len() || to >= self.layers.len() {
            return;
        }
        let layer = self.layers.remove(from);
        self.layers.insert(to, layer);
    }

    /// Remove a layer. The background stays; out-of-range indices are
    /// ignored. The active pointer follows the layer it referred to,
    /// falling back one step when that layer was the one removed.
    pub fn delete_layer(&mut self, index: usize) {
        if index == BACKGROUND_LAYER || index >= self.layers.len() {
            return;
        }
        self.layers.remove(index);
        if self.active_layer >= index {
            self.active_layer -= 1;
        }
    }

    /// Toggle a layer's visibility. Rejected for the background.
    pub fn toggle_layer_visibility(&mut self, index: usize) {
        if index == BACKGROUND_LAYER {
            return;
        }
        if let Some(layer) = self.layers.get_mut(index) {
            layer.visible = !layer.visible;
        }
    }

    /// Tile at a cell on the active layer; `None` is the empty sentinel.
    pub fn get_tile(&self, x: i32, y: i32) -> Option<u32> {
        self.layers[self.active_layer]
            .tiles
            .get(&GridPos::new(x, y))
            .copied()
    }

    /// Place a tile on the active layer.
    pub fn set_tile(&mut self, x: i32, y: i32, tile: u32) {
        self.layers[self.active_layer]
            .tiles
            .insert(GridPos::new(x, y), tile);
    }

    /// Erase a cell on the active layer.
    pub fn remove_tile(&mut self, x: i32, y: i32) {
        self.layers[self.active_layer]
            .tiles
            .remove(&GridPos::new(x, y));
    }

    /// Paint a `size` x `size` square of `tile` centered on `(x, y)`
    /// (biased up-left for even sizes) onto the active layer.
    pub fn brush(&mut self, x: i32, y: i32, tile: u32, size: u32) {
        let half = (size / 2) as i32;
        let start_x = x - half;
        let start_y = y - half;
        for dx in 0..size as i32 {
            for dy in 0..size as i32 {
                self.set_tile(start_x + dx, start_y + dy, tile);
            }
        }
    }

    /// Empty the active layer's tiles. The layer itself stays.
    pub fn clear_active_layer(&mut self) {
        self.layers[self.active_layer].tiles.clear();
    }

    /// Structural invariants: the background layer in place and an in-range
    /// active index. Checked when restoring persisted state, which may
    /// carry anything.
    pub fn is_well_formed(&self) -> bool {
        self.active_layer < self.layers.len()
            && self
                .layers
                .first()
                .is_some_and(|layer| layer.name == BACKGROUND_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_background() {
        let doc = Document::new(100, 100);
        assert_eq!(doc.layers().len(), 1);
        assert_eq!(doc.layers()[0].name, BACKGROUND_NAME);
        assert_eq!(doc.active_layer(), BACKGROUND_LAYER);
    }

    #[test]
    fn test_add_layer_becomes_active() {
        let mut doc = Document::new(10, 10);
        let idx = doc.add_layer(None);
        assert_eq!(idx, 1);
        assert_eq!(doc.active_layer(), 1);
        assert_eq!(doc.layers()[1].name, "Layer 1");

        let idx = doc.add_layer(Some("Props"));
        assert_eq!(idx, 2);
        assert_eq!(doc.layers()[2].name, "Props");
    }

    #[test]
    fn test_set_active_layer_out_of_range_is_noop() {
        let mut doc = Document::new(10, 10);
        doc.add_layer(None);
        doc.set_active_layer(7);
        assert_eq!(doc.active_layer(), 1);
    }

    #[test]
    fn test_tile_roundtrip_and_empty_sentinel() {
        let mut doc = Document::new(10, 10);
        assert_eq!(doc.get_tile(5, 5), None);

        // Tile 0 is a valid tile, distinct from empty.
        doc.set_tile(5, 5, 0);
        assert_eq!(doc.get_tile(5, 5), Some(0));

        doc.remove_tile(5, 5);
        assert_eq!(doc.get_tile(5, 5), None);
    }

    #[test]
    fn test_tiles_outside_grid_are_stored() {
        let mut doc = Document::new(10, 10);
        doc.set_tile(-4, 200, 7);
        assert_eq!(doc.get_tile(-4, 200), Some(7));
    }

    #[test]
    fn test_mutation_targets_active_layer_only() {
        let mut doc = Document::new(10, 10);
        doc.set_tile(0, 0, 1);
        doc.add_layer(None);
        doc.set_tile(0, 0, 2);

        assert_eq!(doc.get_tile(0, 0), Some(2));
        doc.set_active_layer(0);
        assert_eq!(doc.get_tile(0, 0), Some(1));
    }

    #[test]
    fn test_rename_layer_rules() {
        let mut doc = Document::new(10, 10);
        doc.add_layer(None);

        doc.rename_layer(0, "Base");
        assert_eq!(doc.layers()[0].name, BACKGROUND_NAME);

        doc.rename_layer(1, "   ");
        assert_eq!(doc.layers()[1].name, "Layer 1");

        doc.rename_layer(1, "  Trees  ");
        assert_eq!(doc.layers()[1].name, "Trees");
    }

    #[test]
    fn test_reorder_layer_moves_within_stack() {
        let mut doc = Document::new(10, 10);
        doc.add_layer(Some("A"));
        doc.add_layer(Some("B"));
        doc.add_layer(Some("C"));

        doc.reorder_layer(3, 1);
        let names: Vec<&str> = doc.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, [BACKGROUND_NAME, "C", "A", "B"]);
    }

    #[test]
    fn test_reorder_involving_background_is_noop() {
        let mut doc = Document::new(10, 10);
        doc.add_layer(Some("A"));
        doc.add_layer(Some("B"));
        let before = doc.clone();

        doc.reorder_layer(2, 0);
        assert_eq!(doc, before);
        doc.reorder_layer(0, 2);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_visibility_toggle_rejected_for_background() {
        let mut doc = Document::new(10, 10);
        doc.add_layer(None);

        doc.toggle_layer_visibility(0);
        assert!(doc.layers()[0].visible);

        doc.toggle_layer_visibility(1);
        assert!(!doc.layers()[1].visible);
        doc.toggle_layer_visibility(1);
        assert!(doc.layers()[1].visible);
    }

    #[test]
    fn test_delete_layer_rules() {
        let mut doc = Document::new(10, 10);
        doc.add_layer(Some("A"));
        doc.add_layer(Some("B"));

        doc.delete_layer(0);
        assert_eq!(doc.layers().len(), 3);

        // Deleting the active layer drops the pointer one step.
        doc.set_active_layer(1);
        doc.delete_layer(1);
        assert_eq!(doc.layers().len(), 2);
        assert_eq!(doc.layers()[1].name, "B");
        assert_eq!(doc.active_layer(), 0);

        doc.delete_layer(5);
        assert_eq!(doc.layers().len(), 2);
    }

    #[test]
    fn test_well_formedness() {
        let doc = Document::new(10, 10);
        assert!(doc.is_well_formed());

        let json = r#"{"layers":[{"name":"Sneaky","tiles":{}}],"active_layer":0,"grid_width":10,"grid_height":10}"#;
        let bad: Document = serde_json::from_str(json).unwrap();
        assert!(!bad.is_well_formed());

        let json = r#"{"layers":[{"name":"Background","tiles":{}}],"active_layer":3,"grid_width":10,"grid_height":10}"#;
        let bad: Document = serde_json::from_str(json).unwrap();
        assert!(!bad.is_well_formed());
    }

    #[test]
    fn test_brush_paints_square() {
        let mut doc = Document::new(10, 10);
        doc.brush(5, 5, 3, 3);
        for x in 4..=6 {
            for y in 4..=6 {
                assert_eq!(doc.get_tile(x, y), Some(3));
            }
        }
        assert_eq!(doc.get_tile(3, 5), None);
        assert_eq!(doc.get_tile(7, 5), None);
    }

    #[test]
    fn test_clear_active_layer() {
        let mut doc = Document::new(10, 10);
        doc.set_tile(1, 1, 4);
        doc.add_layer(None);
        doc.set_tile(2, 2, 5);

        doc.clear_active_layer();
        assert_eq!(doc.get_tile(2, 2), None);
        doc.set_active_layer(0);
        assert_eq!(doc.get_tile(1, 1), Some(4));
    }
}
