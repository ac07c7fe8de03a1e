//! Core data structures for the tileforge editing engine
//!
//! This crate provides the fundamental types for representing a layered
//! tile map and the geometry around it:
//! - `Document` - the authoritative map: ordered sparse layers over an
//!   integer grid, plus the active-layer pointer
//! - `Layer` - a single named paint surface
//! - `GridPos` - a sparse grid coordinate (unbounded domain)
//! - `TilesetGeometry` - linear tile index <-> source row/column conversion
//! - `Viewport` - camera offset plus surface size, reduced to a grid extent

mod document;
mod grid;
mod layer;
mod tileset;
mod viewport;

pub use document::Document;
pub use grid::{GridPos, ParseGridPosError};
pub use layer::{Layer, BACKGROUND_LAYER, BACKGROUND_NAME};
pub use tileset::TilesetGeometry;
pub use viewport::Viewport;
