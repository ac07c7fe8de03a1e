//! Neighbor-sensitive auto-tiling for terrain painted from a pre-authored
//! transition block
//!
//! A terrain family (paths, water) is backed by a 5-column x 3-row block of
//! 15 tiles in the source tile set:
//!
//! ```text
//!  0  1  2  3  4
//!  5  6  7  8  9
//! 10 11 12 13 14
//! ```
//!
//! Slot 6 is the fully interior tile; the rest are edges, outer corners,
//! and the concave corners where a terrain region wraps around a cell.
//! [`resolve`] picks the slot for a cell from the painted state of the cell
//! itself and its neighborhood; callers write the chosen tile through the
//! layer model. A cell counts as painted when it is marked in the current
//! in-progress stroke or already holds any tile on the active layer.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Columns in a transition block.
pub const BLOCK_COLUMNS: u8 = 5;

/// Rows in a transition block.
pub const BLOCK_ROWS: u8 = 3;

/// Total slots in a transition block.
pub const BLOCK_SLOTS: u8 = BLOCK_COLUMNS * BLOCK_ROWS;

/// Slot of the fully interior terrain tile.
pub const INTERIOR_SLOT: u8 = 6;

/// Column/row offset of a slot inside its transition block.
pub fn slot_offset(slot: u8) -> (u32, u32) {
    ((slot % BLOCK_COLUMNS) as u32, (slot / BLOCK_COLUMNS) as u32)
}

/// Painted state of the 8 cells around a target cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Neighborhood {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
    pub top_left: bool,
    pub top_right: bool,
    pub bottom_left: bool,
    pub bottom_right: bool,
}

impl Neighborhood {
    /// Sample the 8 cells around `(x, y)` through a painted predicate.
    pub fn sample(x: i32, y: i32, painted: impl Fn(i32, i32) -> bool) -> Self {
        Self {
            top: painted(x, y - 1),
            bottom: painted(x, y + 1),
            left: painted(x - 1, y),
            right: painted(x + 1, y),
            top_left: painted(x - 1, y - 1),
            top_right: painted(x + 1, y - 1),
            bottom_left: painted(x - 1, y + 1),
            bottom_right: painted(x + 1, y + 1),
        }
    }
}

/// Pick the transition slot for a cell, or `None` to leave the cell as it
/// is. First match wins; the order is part of the observable behavior.
///
/// A painted cell is always interior. For an unpainted cell, terrain below
/// selects from the top-edge row, terrain above from the bottom-edge row,
/// with the concave pair (slots 8 and 9) taking precedence when terrain
/// wraps around from above. Terrain on one side only selects a vertical
/// edge, and a lone diagonal selects the matching outer corner.
pub fn resolve(self_painted: bool, n: Neighborhood) -> Option<u8> {
    if self_painted {
        return Some(INTERIOR_SLOT);
    }

    let Neighborhood {
        top,
        bottom,
        left,
        right,
        ..
    } = n;

    // Concave corners: terrain above and to one side, open below.
    if left && top && !bottom && !right {
        return Some(9);
    }
    if right && top && !bottom && !left {
        return Some(8);
    }

    // Terrain below the cell: top-edge row of the block.
    if bottom && !top {
        if left && !right {
            return Some(2);
        }
        if right && !left {
            return Some(0);
        }
        return Some(1);
    }

    // Terrain above the cell: bottom-edge row.
    if top && !bottom {
        if left && !right {
            return Some(12);
        }
        if right && !left {
            return Some(10);
        }
        return Some(11);
    }

    // Terrain on one side only: vertical edges.
    if right && !left {
        return Some(5);
    }
    if left && !right {
        return Some(7);
    }

    // No orthogonal neighbor painted: a lone diagonal selects an outer
    // corner tile.
    if !top && !bottom && !left && !right {
        if n.bottom_right {
            return Some(0);
        }
        if n.bottom_left {
            return Some(2);
        }
        if n.top_right {
            return Some(10);
        }
        if n.top_left {
            return Some(12);
        }
    }

    None
}

/// Resolve the slot for `(x, y)` by sampling `painted` over the cell and
/// its neighborhood.
pub fn resolve_at(x: i32, y: i32, painted: impl Fn(i32, i32) -> bool) -> Option<u8> {
    let neighborhood = Neighborhood::sample(x, y, &painted);
    resolve(painted(x, y), neighborhood)
}

/// Cells marked as terrain during an in-progress stroke.
///
/// The marker set lets resolution see cells the stroke has covered before
/// their tiles land on the layer. Transient: cleared when the stroke
/// finishes or is cancelled.
#[derive(Debug, Clone, Default)]
pub struct TerrainStroke {
    marked: HashSet<(i32, i32)>,
}

impl TerrainStroke {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark(&mut self, x: i32, y: i32) {
        self.marked.insert((x, y));
    }

    pub fn is_marked(&self, x: i32, y: i32) -> bool {
        self.marked.contains(&(x, y))
    }

    pub fn is_empty(&self) -> bool {
        self.marked.is_empty()
    }

    pub fn clear(&mut self) {
        self.marked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orthogonal(top: bool, bottom: bool, left: bool, right: bool) -> Neighborhood {
        Neighborhood {
            top,
            bottom,
            left,
            right,
            ..Neighborhood::default()
        }
    }

    #[test]
    fn test_painted_cell_is_interior() {
        // Neighbors are irrelevant once the cell itself is painted.
        assert_eq!(resolve(true, Neighborhood::default()), Some(INTERIOR_SLOT));
        assert_eq!(
            resolve(true, orthogonal(true, true, true, true)),
            Some(INTERIOR_SLOT)
        );
    }

    #[test]
    fn test_terrain_below_selects_top_edge_row() {
        assert_eq!(resolve(false, orthogonal(false, true, true, false)), Some(2));
        assert_eq!(resolve(false, orthogonal(false, true, false, true)), Some(0));
        assert_eq!(resolve(false, orthogonal(false, true, false, false)), Some(1));
        assert_eq!(resolve(false, orthogonal(false, true, true, true)), Some(1));
    }

    #[test]
    fn test_terrain_above_selects_bottom_edge_row() {
        assert_eq!(resolve(false, orthogonal(true, false, false, false)), Some(11));
        assert_eq!(resolve(false, orthogonal(true, false, true, true)), Some(11));
    }

    #[test]
    fn test_concave_corners_win_over_edge_rows() {
        // Terrain above plus one side resolves to the concave pair, not to
        // the bottom-edge row.
        assert_eq!(resolve(false, orthogonal(true, false, false, true)), Some(8));
        assert_eq!(resolve(false, orthogonal(true, false, true, false)), Some(9));
    }

    #[test]
    fn test_side_only_selects_vertical_edges() {
        assert_eq!(resolve(false, orthogonal(false, false, false, true)), Some(5));
        assert_eq!(resolve(false, orthogonal(false, false, true, false)), Some(7));
    }

    #[test]
    fn test_lone_diagonal_selects_outer_corner() {
        let mut n = Neighborhood::default();
        n.bottom_right = true;
        assert_eq!(resolve(false, n), Some(0));

        let mut n = Neighborhood::default();
        n.bottom_left = true;
        assert_eq!(resolve(false, n), Some(2));

        let mut n = Neighborhood::default();
        n.top_right = true;
        assert_eq!(resolve(false, n), Some(10));

        let mut n = Neighborhood::default();
        n.top_left = true;
        assert_eq!(resolve(false, n), Some(12));
    }

    #[test]
    fn test_diagonal_priority() {
        // bottom_right beats the other diagonals.
        let n = Neighborhood {
            bottom_right: true,
            top_left: true,
            ..Neighborhood::default()
        };
        assert_eq!(resolve(false, n), Some(0));
    }

    #[test]
    fn test_isolated_cell_emits_nothing() {
        assert_eq!(resolve(false, Neighborhood::default()), None);
    }

    #[test]
    fn test_surrounded_but_unpainted_emits_nothing() {
        assert_eq!(resolve(false, orthogonal(true, true, true, true)), None);
        assert_eq!(resolve(false, orthogonal(true, true, false, false)), None);
    }

    #[test]
    fn test_resolution_is_pure() {
        let n = orthogonal(true, false, false, true);
        assert_eq!(resolve(false, n), resolve(false, n));
    }

    #[test]
    fn test_resolve_at_samples_predicate() {
        // One painted cell at (5, 6): the cell above it sees terrain below.
        let painted = |x: i32, y: i32| (x, y) == (5, 6);
        assert_eq!(resolve_at(5, 5, painted), Some(1));
        assert_eq!(resolve_at(5, 6, painted), Some(INTERIOR_SLOT));
        assert_eq!(resolve_at(4, 5, painted), Some(0));
    }

    #[test]
    fn test_slot_offsets() {
        assert_eq!(slot_offset(0), (0, 0));
        assert_eq!(slot_offset(4), (4, 0));
        assert_eq!(slot_offset(6), (1, 1));
        assert_eq!(slot_offset(14), (4, 2));
    }

    #[test]
    fn test_stroke_markers() {
        let mut stroke = TerrainStroke::new();
        assert!(stroke.is_empty());
        stroke.mark(3, -2);
        assert!(stroke.is_marked(3, -2));
        assert!(!stroke.is_marked(-2, 3));
        stroke.clear();
        assert!(stroke.is_empty());
    }
}
