//! Fill engine: flood fill and viewport fill over the active layer

use std::collections::{HashSet, VecDeque};
use tileforge_core::{Document, Viewport};

/// Bucket fill at `(x, y)` with `new_tile`.
///
/// Two policies, picked by what the origin cell holds:
/// - an empty origin fills every *empty* cell inside the viewport's visible
///   grid extent, and nothing beyond it;
/// - an occupied origin replaces its whole 4-connected region of equal
///   tiles, unbounded by the viewport. The region is finite because only
///   stored tiles equal to the origin's are followed.
///
/// A no-op when the origin already holds `new_tile`.
pub fn flood_fill(document: &mut Document, x: i32, y: i32, new_tile: u32, viewport: &Viewport) {
    let target = document.get_tile(x, y);
    if target == Some(new_tile) {
        return;
    }

    match target {
        None => {
            let (x0, y0, x1, y1) = viewport.grid_extent();
            for gx in x0..=x1 {
                for gy in y0..=y1 {
                    if document.get_tile(gx, gy).is_none() {
                        document.set_tile(gx, gy, new_tile);
                    }
                }
            }
        }
        Some(target) => {
            let mut queue = VecDeque::from([(x, y)]);
            let mut visited = HashSet::from([(x, y)]);

            while let Some((cx, cy)) = queue.pop_front() {
                document.set_tile(cx, cy, new_tile);

                let neighbors = [(cx, cy - 1), (cx, cy + 1), (cx - 1, cy), (cx + 1, cy)];
                for (nx, ny) in neighbors {
                    if visited.insert((nx, ny)) && document.get_tile(nx, ny) == Some(target) {
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport_160() -> Viewport {
        Viewport::new(0.0, 0.0, 160.0, 160.0, 16)
    }

    #[test]
    fn test_empty_origin_fills_visible_extent() {
        let mut doc = Document::new(100, 100);
        flood_fill(&mut doc, 5, 5, 7, &viewport_160());

        for x in 0..=9 {
            for y in 0..=9 {
                assert_eq!(doc.get_tile(x, y), Some(7), "cell ({x}, {y})");
            }
        }
        assert_eq!(doc.get_tile(10, 10), None);
        assert_eq!(doc.get_tile(10, 0), None);
        assert_eq!(doc.get_tile(0, 10), None);
    }

    #[test]
    fn test_viewport_fill_skips_occupied_cells() {
        let mut doc = Document::new(100, 100);
        doc.set_tile(3, 3, 1);
        flood_fill(&mut doc, 5, 5, 7, &viewport_160());

        assert_eq!(doc.get_tile(3, 3), Some(1));
        assert_eq!(doc.get_tile(4, 3), Some(7));
    }

    #[test]
    fn test_flood_fill_replaces_connected_region_only() {
        let mut doc = Document::new(100, 100);
        doc.set_tile(0, 0, 3);
        doc.set_tile(1, 0, 3);
        doc.set_tile(0, 1, 3);
        doc.set_tile(5, 5, 9);

        flood_fill(&mut doc, 0, 0, 8, &viewport_160());

        assert_eq!(doc.get_tile(0, 0), Some(8));
        assert_eq!(doc.get_tile(1, 0), Some(8));
        assert_eq!(doc.get_tile(0, 1), Some(8));
        assert_eq!(doc.get_tile(5, 5), Some(9));
        // Empty cells were not touched in this mode.
        assert_eq!(doc.get_tile(2, 0), None);
    }

    #[test]
    fn test_flood_fill_crosses_grid_edge() {
        // Sparse storage: the region is bounded by its own tiles, not by
        // the configured grid.
        let mut doc = Document::new(4, 4);
        doc.set_tile(3, 0, 2);
        doc.set_tile(4, 0, 2);
        doc.set_tile(5, 0, 2);

        flood_fill(&mut doc, 3, 0, 6, &viewport_160());
        assert_eq!(doc.get_tile(5, 0), Some(6));
    }

    #[test]
    fn test_fill_is_idempotent() {
        let mut doc = Document::new(100, 100);
        doc.set_tile(0, 0, 3);
        doc.set_tile(1, 0, 3);

        flood_fill(&mut doc, 0, 0, 8, &viewport_160());
        let once = doc.clone();
        flood_fill(&mut doc, 0, 0, 8, &viewport_160());
        assert_eq!(doc, once);

        let mut empty_fill = Document::new(100, 100);
        flood_fill(&mut empty_fill, 5, 5, 7, &viewport_160());
        let once = empty_fill.clone();
        flood_fill(&mut empty_fill, 5, 5, 7, &viewport_160());
        assert_eq!(empty_fill, once);
    }

    #[test]
    fn test_fill_same_tile_is_noop() {
        let mut doc = Document::new(100, 100);
        doc.set_tile(0, 0, 3);
        let before = doc.clone();

        flood_fill(&mut doc, 0, 0, 3, &viewport_160());
        assert_eq!(doc, before);
    }
}
