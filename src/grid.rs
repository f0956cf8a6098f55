//! Geocells: a 4x4 recursive subdivision of the lon/lat rectangle.
//!
//! Each level splits the current cell into a 4x4 grid and appends one
//! character of `0123456789abcdef`. The character interleaves the low bits of
//! the column and row (Morton order), so lexicographically close geocells tend
//! to be spatially close. A geocell's length is its resolution.
//!
//! ```text
//!   north
//!   a b e f
//!   8 9 c d
//!   2 3 6 7
//!   0 1 4 5
//!   south
//! ```
//!
//! ```rust
//! use tilecover::grid;
//!
//! let cell = grid::compute(0.0, 0.0, 1);
//! assert_eq!(cell, "c");
//!
//! let bbox = grid::compute_box("c").unwrap();
//! assert_eq!((bbox.west(), bbox.south()), (0.0, 0.0));
//! assert_eq!((bbox.east(), bbox.north()), (90.0, 45.0));
//! ```

use crate::error::{Result, TileError};
use tilecover_types::{BoundingBox, Direction, TileId};

/// Cells per axis at every level.
pub const GRID_SIZE: u8 = 4;

/// One character per cell of the 4x4 grid.
pub const ALPHABET: &str = "0123456789abcdef";

/// Deepest resolution the coverage search accepts for geocells.
pub const MAX_RESOLUTION: usize = 23;

const ALPHABET_BYTES: &[u8; 16] = b"0123456789abcdef";
const SCHEME: &str = "geocell";

/// Geocell holding `(lon, lat)` at the given resolution.
///
/// Coordinates outside the lon/lat range land in the nearest edge cell.
///
/// # Examples
///
/// ```rust
/// use tilecover::grid::compute;
///
/// let cell = compute(-74.0060, 40.7128, 6);
/// assert_eq!(cell.len(), 6);
/// assert!(cell.starts_with(&compute(-74.0060, 40.7128, 3)));
/// ```
pub fn compute(lon: f64, lat: f64, resolution: usize) -> TileId {
    let (mut west, mut south, mut east, mut north) = (-180.0f64, -90.0f64, 180.0f64, 90.0f64);
    let size = f64::from(GRID_SIZE);

    let mut cell = String::with_capacity(resolution);
    while cell.len() < resolution {
        let lon_span = (east - west) / size;
        let lat_span = (north - south) / size;

        let x = grid_index(size * (lon - west) / (east - west));
        let y = grid_index(size * (lat - south) / (north - south));
        cell.push(char_for_xy(x, y));

        south += lat_span * f64::from(y);
        north = south + lat_span;

        west += lon_span * f64::from(x);
        east = west + lon_span;
    }
    cell
}

/// Character for column `x` and row `y` of a 4x4 grid. Only the low two bits
/// of each are used.
pub fn char_for_xy(x: u8, y: u8) -> char {
    let index = (y & 2) << 2 | (x & 2) << 1 | (y & 1) << 1 | (x & 1);
    char::from(ALPHABET_BYTES[usize::from(index)])
}

/// Column and row of a geocell character.
///
/// # Errors
///
/// Returns `TileError::InvalidTileId` for characters outside the alphabet.
pub fn xy_for_char(character: char) -> Result<(u8, u8)> {
    let index = alphabet_index(character).ok_or_else(|| TileError::InvalidTileId {
        scheme: SCHEME,
        tile: character.to_string(),
        character,
    })?;
    Ok(((index & 4) >> 1 | (index & 1), (index & 8) >> 2 | (index & 2) >> 1))
}

/// Whether two geocells share a column (`column == true`) or a row at every
/// level they have in common.
pub fn collinear(first: &str, second: &str, column: bool) -> Result<bool> {
    for (a, b) in decode(first)?.into_iter().zip(decode(second)?) {
        if column && a.0 != b.0 {
            return Ok(false);
        }
        if !column && a.1 != b.1 {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Neighboring geocell of the same resolution in `direction`.
///
/// The id is treated as a base-4 odometer: the deepest character moves first
/// and a step across a parent edge carries into the parent character.
/// Longitude wraps around the globe, so stepping west of -180 lands on the
/// eastern-most column. Latitude does not wrap: stepping north of the top row
/// or south of the bottom row yields `None`.
///
/// # Examples
///
/// ```rust
/// use tilecover::grid::adjacent;
/// use tilecover_types::Direction;
///
/// assert_eq!(adjacent("c", Direction::East).unwrap().as_deref(), Some("d"));
/// assert_eq!(adjacent("0", Direction::West).unwrap().as_deref(), Some("5"));
/// assert_eq!(adjacent("a", Direction::North).unwrap(), None);
/// ```
pub fn adjacent(cell: &str, direction: Direction) -> Result<Option<TileId>> {
    let mut digits = decode(cell)?;
    let (mut dx, mut dy) = direction.offset();
    let last = GRID_SIZE - 1;

    for (x, y) in digits.iter_mut().rev() {
        if dx == 0 && dy == 0 {
            break;
        }

        match dx {
            -1 if *x == 0 => *x = last,
            -1 => {
                *x -= 1;
                dx = 0;
            }
            1 if *x == last => *x = 0,
            1 => {
                *x += 1;
                dx = 0;
            }
            _ => {}
        }

        match dy {
            1 if *y == last => *y = 0,
            1 => {
                *y += 1;
                dy = 0;
            }
            -1 if *y == 0 => *y = last,
            -1 => {
                *y -= 1;
                dy = 0;
            }
            _ => {}
        }
    }

    // A leftover vertical carry would have to wrap over a pole.
    if dy != 0 {
        return Ok(None);
    }

    Ok(Some(digits.into_iter().map(|(x, y)| char_for_xy(x, y)).collect()))
}

/// Every geocell in the rectangle spanned by `cell_nw` and `cell_se`, both of
/// the same resolution.
///
/// Rows are listed from south to north; within a row cells run from east to
/// west. When the block runs off the map (for instance because `cell_nw` is
/// not actually north of `cell_se`) the cells gathered so far are returned.
pub fn interpolate(cell_nw: &str, cell_se: &str) -> Result<Vec<TileId>> {
    let mut first_row = vec![cell_se.to_string()];
    loop {
        let current = &first_row[first_row.len() - 1];
        if collinear(current, cell_nw, true)? {
            break;
        }
        match adjacent(current, Direction::West)? {
            Some(next) => first_row.push(next),
            None => break,
        }
    }

    let mut rows = vec![first_row];
    loop {
        let previous = &rows[rows.len() - 1];
        if previous.last().is_some_and(|cell| cell == cell_nw) {
            break;
        }
        let mut row = Vec::with_capacity(previous.len());
        for cell in previous {
            match adjacent(cell, Direction::North)? {
                Some(next) => row.push(next),
                None => break,
            }
        }
        if row.len() < previous.len() {
            break;
        }
        rows.push(row);
    }

    Ok(rows.into_iter().flatten().collect())
}

/// Bounding box of a geocell. The empty id denotes the whole earth.
///
/// # Errors
///
/// Returns `TileError::InvalidTileId` when the id contains a character
/// outside the alphabet.
pub fn compute_box(cell: &str) -> Result<BoundingBox> {
    let (mut west, mut south, mut east, mut north) = (-180.0f64, -90.0f64, 180.0f64, 90.0f64);
    let size = f64::from(GRID_SIZE);

    for (x, y) in decode(cell)? {
        let lon_span = (east - west) / size;
        let lat_span = (north - south) / size;

        west += lon_span * f64::from(x);
        east = west + lon_span;
        south += lat_span * f64::from(y);
        north = south + lat_span;
    }
    Ok(BoundingBox::new(west, south, east, north))
}

/// The 16 children of a geocell, in alphabet order.
pub fn children_for(cell: &str) -> Vec<TileId> {
    ALPHABET
        .chars()
        .map(|c| {
            let mut child = String::with_capacity(cell.len() + 1);
            child.push_str(cell);
            child.push(c);
            child
        })
        .collect()
}

/// Estimate of how many geocells at `resolution` overlap `bbox`.
///
/// Counts the columns and rows between the cells holding the box's corners.
/// Used to reject geometries before running a coverage search that would
/// overflow anyway.
pub fn cell_count(bbox: &BoundingBox, resolution: usize) -> u64 {
    let ne = compute(bbox.east(), bbox.north(), resolution);
    let sw = compute(bbox.west(), bbox.south(), resolution);

    // Both ids come straight out of `compute`, so decoding cannot fail.
    let (Ok(ne_box), Ok(sw_box)) = (compute_box(&ne), compute_box(&sw)) else {
        return 0;
    };

    let columns = ((ne_box.east() - sw_box.west()) / sw_box.width()).round();
    let rows = ((ne_box.north() - sw_box.south()) / sw_box.height()).round();
    (columns.max(0.0) as u64).saturating_mul(rows.max(0.0) as u64)
}

fn grid_index(position: f64) -> u8 {
    // `as` saturates: NaN and negatives become 0.
    (position as u8).min(GRID_SIZE - 1)
}

fn alphabet_index(character: char) -> Option<u8> {
    ALPHABET_BYTES
        .iter()
        .position(|&b| char::from(b) == character)
        .map(|index| index as u8)
}

fn decode(cell: &str) -> Result<Vec<(u8, u8)>> {
    cell.chars()
        .map(|character| {
            xy_for_char(character).map_err(|_| TileError::InvalidTileId {
                scheme: SCHEME,
                tile: cell.to_string(),
                character,
            })
        })
        .collect()
}
