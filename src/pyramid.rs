//! Quadkeys: the Web-Mercator slippy-map tile pyramid.
//!
//! Longitude/latitude is projected into a square pixel space of
//! `256 * 2^zoom` pixels per axis, cut into 256-pixel tiles, and each tile is
//! named by a string of base-4 digits, one per zoom level. Digit `1` sets the
//! x bit and digit `2` the y bit of that level.
//!
//! ```rust
//! use tilecover::pyramid;
//!
//! assert_eq!(pyramid::geo_point_to_quad_key(0.0, 0.0, 1), "3");
//!
//! let tile = pyramid::quad_key_to_tile_xy("213").unwrap();
//! assert_eq!((tile.x, tile.y, tile.zoom), (3, 5, 3));
//! ```

use crate::compute::geometry;
use crate::error::{Result, TileError};
use geo::Geometry;
use smallvec::SmallVec;
use std::f64::consts::PI;
use tilecover_types::{BoundingBox, Direction, PixelCoordinate, TileCoordinate, TileId};

/// Edge length of a tile in pixels.
pub const TILE_SIZE: u64 = 256;

pub const MIN_LATITUDE: f64 = -85.05112878;
pub const MAX_LATITUDE: f64 = 85.05112878;
pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Deepest zoom level.
pub const MAX_ZOOM: u8 = 23;

const SCHEME: &str = "quadkey";

/// Width and height of the pixel space at `zoom`.
///
/// Every function in this module treats zoom levels above [`MAX_ZOOM`] as
/// [`MAX_ZOOM`].
pub fn map_size(zoom: u8) -> u64 {
    TILE_SIZE << clamp_zoom(zoom)
}

/// Highest tile index along either axis at `zoom`.
pub fn max_tile_at_zoom(zoom: u8) -> u32 {
    (1u32 << clamp_zoom(zoom)) - 1
}

fn clamp_zoom(zoom: u8) -> u8 {
    zoom.min(MAX_ZOOM)
}

fn clip(n: f64, min_value: f64, max_value: f64) -> f64 {
    n.max(min_value).min(max_value)
}

/// Project a lon/lat position (degrees) to pixel coordinates at `zoom`.
///
/// Latitude is clamped to the Mercator-safe range and each axis is clamped
/// into `[0, map_size - 1]`.
pub fn geo_point_to_pixel_xy(lon: f64, lat: f64, zoom: u8) -> PixelCoordinate {
    let lat = clip(lat, MIN_LATITUDE, MAX_LATITUDE);
    let lon = clip(lon, MIN_LONGITUDE, MAX_LONGITUDE);

    let x = (lon + 180.0) / 360.0;
    let sin_lat = lat.to_radians().sin();
    let y = 0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI);

    let size = map_size(zoom) as f64;
    PixelCoordinate::new(
        clip(x * size + 0.5, 0.0, size - 1.0) as u64,
        clip(y * size + 0.5, 0.0, size - 1.0) as u64,
    )
}

/// Tile holding a pixel.
///
/// Pixels past the edge of the map land in the last row or column.
pub fn pixel_xy_to_tile_xy(pixel: PixelCoordinate, zoom: u8) -> TileCoordinate {
    let zoom = clamp_zoom(zoom);
    let max = u64::from(max_tile_at_zoom(zoom));
    TileCoordinate::new(
        (pixel.x / TILE_SIZE).min(max) as u32,
        (pixel.y / TILE_SIZE).min(max) as u32,
        zoom,
    )
}

/// Upper-left pixel of a tile.
pub fn tile_xy_to_pixel_xy(tile: TileCoordinate) -> PixelCoordinate {
    PixelCoordinate::new(u64::from(tile.x) * TILE_SIZE, u64::from(tile.y) * TILE_SIZE)
}

/// Quadkey of a tile, most significant level first.
///
/// # Examples
///
/// ```rust
/// use tilecover::pyramid::tile_xy_to_quad_key;
/// use tilecover_types::TileCoordinate;
///
/// assert_eq!(tile_xy_to_quad_key(TileCoordinate::new(3, 5, 3)), "213");
/// ```
pub fn tile_xy_to_quad_key(tile: TileCoordinate) -> TileId {
    (1..=clamp_zoom(tile.zoom))
        .rev()
        .map(|level| {
            let mask = 1u32 << (level - 1);
            let mut digit = b'0';
            if tile.x & mask != 0 {
                digit += 1;
            }
            if tile.y & mask != 0 {
                digit += 2;
            }
            char::from(digit)
        })
        .collect()
}

/// Tile named by a quadkey; its zoom is the key's length.
///
/// # Errors
///
/// Returns `TileError::InvalidTileId` for any digit outside `0-3` and
/// `TileError::InvalidResolution` for keys longer than [`MAX_ZOOM`].
pub fn quad_key_to_tile_xy(quad_key: &str) -> Result<TileCoordinate> {
    let zoom = quad_key.len();
    if zoom > usize::from(MAX_ZOOM) {
        return Err(TileError::InvalidResolution {
            resolution: zoom,
            max: usize::from(MAX_ZOOM),
        });
    }

    let (mut x, mut y) = (0u32, 0u32);
    for (i, character) in quad_key.chars().enumerate() {
        let mask = 1u32 << (zoom - i - 1);
        match character {
            '0' => {}
            '1' => x |= mask,
            '2' => y |= mask,
            '3' => {
                x |= mask;
                y |= mask;
            }
            _ => {
                return Err(TileError::InvalidTileId {
                    scheme: SCHEME,
                    tile: quad_key.to_string(),
                    character,
                });
            }
        }
    }
    Ok(TileCoordinate::new(x, y, zoom as u8))
}

/// Quadkey of the tile holding `(lon, lat)` at `zoom`.
pub fn geo_point_to_quad_key(lon: f64, lat: f64, zoom: u8) -> TileId {
    let pixel = geo_point_to_pixel_xy(lon, lat, zoom);
    tile_xy_to_quad_key(pixel_xy_to_tile_xy(pixel, zoom))
}

/// Bounding box of a quadkey in degrees.
///
/// The tile's pixel rectangle is projected back with the inverse Mercator
/// transform. The empty key is the whole Mercator square.
pub fn quad_key_to_box(quad_key: &str) -> Result<BoundingBox> {
    let tile = quad_key_to_tile_xy(quad_key)?;
    let size = map_size(tile.zoom) as f64;

    let min = tile_xy_to_pixel_xy(tile);
    let max = PixelCoordinate::new(min.x + TILE_SIZE, min.y + TILE_SIZE);

    let west = min.x as f64 * 360.0 / size - 180.0;
    let east = max.x as f64 * 360.0 / size - 180.0;
    let north = pixel_y_to_latitude(min.y as f64, size);
    let south = pixel_y_to_latitude(max.y as f64, size);

    Ok(BoundingBox::new(west, south, east, north))
}

fn pixel_y_to_latitude(pixel_y: f64, size: f64) -> f64 {
    (2.0 * PI * (0.5 - pixel_y / size)).tanh().asin().to_degrees()
}

/// Deepest quadkey at or above `max_zoom` that fully contains `geometry`.
///
/// Walks from `max_zoom` down to 1, testing the tile under the geometry's
/// centroid. Returns an empty string when even the zoom 1 tile is too small;
/// callers treat that as "no containing tile", not as a failure.
pub fn containing_quad_key(geometry: &Geometry, max_zoom: u8) -> TileId {
    let Some(center) = geometry::centroid(geometry) else {
        return TileId::new();
    };

    for zoom in (1..=max_zoom.min(MAX_ZOOM)).rev() {
        let quad_key = geo_point_to_quad_key(center.x(), center.y(), zoom);
        let contains = quad_key_to_box(&quad_key)
            .and_then(|bbox| geometry::box_contains(&bbox, geometry));
        match contains {
            Ok(true) => return quad_key,
            Ok(false) => {}
            Err(e) => {
                log::warn!("Skipping containment test for {}: {}", quad_key, e);
            }
        }
    }
    TileId::new()
}

/// The four children of a quadkey.
pub fn children_for(quad_key: &str) -> Vec<TileId> {
    ('0'..='3')
        .map(|digit| {
            let mut child = String::with_capacity(quad_key.len() + 1);
            child.push_str(quad_key);
            child.push(digit);
            child
        })
        .collect()
}

/// Neighboring quadkey of the same zoom in `direction`.
///
/// Tile columns wrap around the anti-meridian; rows stop at the edge of the
/// Mercator square, where `None` is returned.
pub fn adjacent(quad_key: &str, direction: Direction) -> Result<Option<TileId>> {
    let tile = quad_key_to_tile_xy(quad_key)?;
    let tiles = tile.tiles_per_axis() as i64;

    // Rows grow southwards, so north is a step towards y = 0.
    let y = i64::from(tile.y) - i64::from(direction.dy());
    if !(0..tiles).contains(&y) {
        return Ok(None);
    }
    let x = (i64::from(tile.x) + i64::from(direction.dx())).rem_euclid(tiles);

    Ok(Some(tile_xy_to_quad_key(TileCoordinate::new(
        x as u32,
        y as u32,
        tile.zoom,
    ))))
}

/// Quadkey holding `(lon, lat)` followed by its distinct neighbors.
///
/// Up to nine keys: fewer on the top and bottom rows, and at low zoom levels
/// where wrapped neighbors coincide.
///
/// # Examples
///
/// ```rust
/// use tilecover::pyramid::quad_key_and_neighbors;
///
/// let keys = quad_key_and_neighbors(-74.0060, 40.7128, 12);
/// assert_eq!(keys.len(), 9);
/// assert_eq!(keys[0], tilecover::pyramid::geo_point_to_quad_key(-74.0060, 40.7128, 12));
/// ```
pub fn quad_key_and_neighbors(lon: f64, lat: f64, zoom: u8) -> SmallVec<[TileId; 9]> {
    let center = geo_point_to_quad_key(lon, lat, zoom);
    let mut keys: SmallVec<[TileId; 9]> = SmallVec::new();

    for direction in Direction::ALL {
        // `center` was produced by the encoder, so it always decodes.
        if let Ok(Some(neighbor)) = adjacent(&center, direction)
            && neighbor != center
            && !keys.contains(&neighbor)
        {
            keys.push(neighbor);
        }
    }
    keys.insert(0, center);
    keys
}

/// Estimate of how many tiles at `zoom` overlap `bbox`, from the tile range
/// of its corners.
pub fn tile_count(bbox: &BoundingBox, zoom: u8) -> u64 {
    let nw = pixel_xy_to_tile_xy(geo_point_to_pixel_xy(bbox.west(), bbox.north(), zoom), zoom);
    let se = pixel_xy_to_tile_xy(geo_point_to_pixel_xy(bbox.east(), bbox.south(), zoom), zoom);

    let columns = u64::from(se.x.abs_diff(nw.x)) + 1;
    let rows = u64::from(se.y.abs_diff(nw.y)) + 1;
    columns * rows
}
