use serde::{Deserialize, Serialize};

/// A tile identifier.
///
/// Geocells use the alphabet `0-9a-f`, quadkeys the digits `0-3`. In both
/// schemes the string length is the resolution and every prefix names the
/// enclosing parent tile.
pub type TileId = String;

/// Tile position within a pyramid zoom level.
///
/// `x` grows eastwards and `y` southwards, both in `0..2^zoom`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoordinate {
    pub x: u32,
    pub y: u32,
    pub zoom: u8,
}

impl TileCoordinate {
    /// Create a new tile coordinate.
    ///
    /// # Examples
    ///
    /// ```
    /// use tilecover_types::tile::TileCoordinate;
    ///
    /// let tile = TileCoordinate::new(3, 5, 4);
    /// assert_eq!(tile.tiles_per_axis(), 16);
    /// ```
    pub const fn new(x: u32, y: u32, zoom: u8) -> Self {
        Self { x, y, zoom }
    }

    /// Number of tiles along one axis at this zoom level.
    pub const fn tiles_per_axis(&self) -> u64 {
        1u64 << self.zoom
    }
}

/// Position inside a zoom level's pixel space (`256 * 2^zoom` per axis).
///
/// Stored as `u64` since the deepest zoom levels exceed `i32::MAX` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelCoordinate {
    pub x: u64,
    pub y: u64,
}

impl PixelCoordinate {
    pub const fn new(x: u64, y: u64) -> Self {
        Self { x, y }
    }
}
