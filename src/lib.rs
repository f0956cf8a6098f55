//! Hierarchical geocell and quadkey tiling with bounded recursive coverage search.
//!
//! ```rust
//! use tilecover::{CoverageConfig, GridScheme, PyramidScheme, coverage_search, grid, pyramid};
//! use geo::{Geometry, LineString};
//!
//! assert_eq!(grid::compute(0.0, 0.0, 1), "c");
//! assert_eq!(pyramid::geo_point_to_quad_key(0.0, 0.0, 1), "3");
//!
//! let route: Geometry = LineString::from(vec![(-74.0, 40.7), (-73.9, 40.8)]).into();
//! let config = CoverageConfig::default();
//! let cells = coverage_search(&GridScheme, &route, 8, &config)?.into_tiles();
//! let keys = coverage_search(&PyramidScheme, &route, 12, &config)?.into_tiles();
//! assert!(!cells.is_empty() && !keys.is_empty());
//! # Ok::<(), tilecover::TileError>(())
//! ```

pub mod compute;
pub mod config;
pub mod coverage;
pub mod dispatch;
pub mod error;
pub mod grid;
pub mod pyramid;

pub use compute::validation;

pub use config::{CoverageConfig, MAX_TILES};
pub use coverage::{
    Coverage, GridScheme, PyramidScheme, TilingScheme, children_containing, coverage_search,
};
pub use dispatch::{search_children, tiles_for_geometry};
pub use error::{Result, TileError};

pub use tilecover_types::{BoundingBox, Direction, PixelCoordinate, TileCoordinate, TileId};

/// Common imports
pub mod prelude {

    pub use crate::{CoverageConfig, Result, TileError};

    pub use crate::{Coverage, GridScheme, PyramidScheme, TilingScheme, coverage_search};

    pub use crate::{search_children, tiles_for_geometry};

    pub use crate::{BoundingBox, Direction, TileId};

    pub use geo::{Geometry, Point, Polygon, Rect};
}
