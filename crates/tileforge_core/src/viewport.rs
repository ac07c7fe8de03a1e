//! Camera viewport reduced to a grid extent

use serde::{Deserialize, Serialize};

/// The visible window onto the map: camera offset and surface size in
/// pixels, plus the tile size used to project onto the grid. Consumed only
/// by the fill engine's viewport-fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub camera_x: f32,
    pub camera_y: f32,
    pub width: f32,
    pub height: f32,
    pub tile_size: u32,
}

impl Viewport {
    pub fn new(camera_x: f32, camera_y: f32, width: f32, height: f32, tile_size: u32) -> Self {
        Self {
            camera_x,
            camera_y,
            width,
            height,
            tile_size,
        }
    }

    /// Inclusive extent `(x0, y0, x1, y1)` of grid cells at least partially
    /// visible. A cell sharing only an edge with the surface boundary does
    /// not count as visible.
    pub fn grid_extent(&self) -> (i32, i32, i32, i32) {
        let ts = self.tile_size as f32;
        let x0 = (self.camera_x / ts).floor() as i32;
        let y0 = (self.camera_y / ts).floor() as i32;
        let x1 = ((self.camera_x + self.width) / ts).ceil() as i32 - 1;
        let y1 = ((self.camera_y + self.height) / ts).ceil() as i32 - 1;
        (x0, y0, x1, y1)
    }
}
