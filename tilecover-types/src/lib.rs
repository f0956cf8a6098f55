//! # tilecover-types
//!
//! Core value types shared by the tilecover tiling schemes.
//!
//! - **Tile identifiers**: `TileId`, `TileCoordinate`, `PixelCoordinate`
//! - **Extents**: `BoundingBox`
//! - **Adjacency**: `Direction`
//!
//! All types are plain immutable values, serializable with Serde and built on
//! top of the `geo` crate's primitives.
//!
//! ## Examples
//!
//! ```rust
//! use tilecover_types::bbox::BoundingBox;
//! use tilecover_types::direction::Direction;
//! use geo::Point;
//!
//! let whole = BoundingBox::whole_earth();
//! assert!(whole.contains_point(&Point::new(-74.0060, 40.7128)));
//!
//! assert_eq!(Direction::NorthEast.offset(), (1, 1));
//! ```

pub mod bbox;
pub mod direction;
pub mod tile;

pub use bbox::BoundingBox;
pub use direction::Direction;
pub use tile::{PixelCoordinate, TileCoordinate, TileId};
