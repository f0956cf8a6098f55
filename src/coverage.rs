//! Recursive coverage search over a tiling scheme.
//!
//! A search starts from a handful of root tiles picked by the scheme and
//! descends towards the target resolution, pruning every tile whose box misses
//! the geometry and handing each surviving child only the part of the geometry
//! that falls inside its parent. The number of emitted tiles is capped; a
//! search that would exceed the cap is abandoned as a whole.
//!
//! ```rust
//! use tilecover::coverage::{GridScheme, coverage_search};
//! use tilecover::CoverageConfig;
//! use geo::{Geometry, Rect, coord};
//!
//! let area: Geometry = Rect::new(coord! { x: 0.1, y: 0.1 }, coord! { x: 89.9, y: 44.9 }).into();
//! let tiles = coverage_search(&GridScheme, &area, 1, &CoverageConfig::default())?.into_tiles();
//! assert_eq!(tiles, vec!["c".to_string()]);
//! # Ok::<(), tilecover::TileError>(())
//! ```

use crate::compute::geometry;
use crate::compute::validation::{validate_geometry, validate_resolution};
use crate::config::CoverageConfig;
use crate::error::{Result, TileError};
use crate::{grid, pyramid};
use geo::Geometry;
use std::ops::ControlFlow;
use tilecover_types::{BoundingBox, TileId};

/// What coverage search needs to know about a hierarchical tiling.
pub trait TilingScheme {
    /// Short scheme name used in log messages.
    const NAME: &'static str;

    /// Deepest resolution the scheme can encode.
    fn max_resolution(&self) -> usize;

    fn bounding_box_of(&self, tile: &str) -> Result<BoundingBox>;

    /// Tiles one level below `tile`. The empty id is the parent of the
    /// resolution 1 tiles.
    fn children_of(&self, tile: &str) -> Vec<TileId>;

    fn resolution_of(&self, tile: &str) -> usize {
        tile.len()
    }

    /// Tile holding a lon/lat position at `resolution`.
    fn tile_for_point(&self, lon: f64, lat: f64, resolution: usize) -> TileId;

    /// Tiles the descent starts from. Together they must cover every part of
    /// the map the geometry can touch.
    fn search_roots(&self, geometry: &Geometry, max_depth: usize) -> Result<Vec<TileId>>;

    /// Cheap upper estimate of the tiles needed to cover `bbox` at
    /// `resolution`, used to refuse hopeless inputs before searching.
    fn estimate_tile_count(&self, bbox: &BoundingBox, resolution: usize) -> u64;
}

/// Geocells: 4x4 subdivision of the lon/lat rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridScheme;

impl TilingScheme for GridScheme {
    const NAME: &'static str = "geocell";

    fn max_resolution(&self) -> usize {
        grid::MAX_RESOLUTION
    }

    fn bounding_box_of(&self, tile: &str) -> Result<BoundingBox> {
        grid::compute_box(tile)
    }

    fn children_of(&self, tile: &str) -> Vec<TileId> {
        grid::children_for(tile)
    }

    fn tile_for_point(&self, lon: f64, lat: f64, resolution: usize) -> TileId {
        grid::compute(lon, lat, resolution)
    }

    fn search_roots(&self, _geometry: &Geometry, _max_depth: usize) -> Result<Vec<TileId>> {
        // Every level 1 cell: a geometry ending on a cell border also touches
        // the cell across it, which the envelope's corner cells would miss.
        let north_west = grid::compute(-180.0, 90.0, 1);
        let south_east = grid::compute(180.0, -90.0, 1);
        grid::interpolate(&north_west, &south_east)
    }

    fn estimate_tile_count(&self, bbox: &BoundingBox, resolution: usize) -> u64 {
        grid::cell_count(bbox, resolution)
    }
}

/// Quadkeys: the Web-Mercator tile pyramid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PyramidScheme;

impl PyramidScheme {
    fn zoom(resolution: usize) -> u8 {
        u8::try_from(resolution)
            .unwrap_or(pyramid::MAX_ZOOM)
            .min(pyramid::MAX_ZOOM)
    }
}

impl TilingScheme for PyramidScheme {
    const NAME: &'static str = "quadkey";

    fn max_resolution(&self) -> usize {
        usize::from(pyramid::MAX_ZOOM)
    }

    fn bounding_box_of(&self, tile: &str) -> Result<BoundingBox> {
        pyramid::quad_key_to_box(tile)
    }

    fn children_of(&self, tile: &str) -> Vec<TileId> {
        pyramid::children_for(tile)
    }

    fn tile_for_point(&self, lon: f64, lat: f64, resolution: usize) -> TileId {
        pyramid::geo_point_to_quad_key(lon, lat, Self::zoom(resolution))
    }

    fn search_roots(&self, geometry: &Geometry, max_depth: usize) -> Result<Vec<TileId>> {
        let container = pyramid::containing_quad_key(geometry, Self::zoom(max_depth));
        if container.len() >= max_depth {
            return Ok(vec![container]);
        }
        Ok(pyramid::children_for(&container))
    }

    fn estimate_tile_count(&self, bbox: &BoundingBox, resolution: usize) -> u64 {
        pyramid::tile_count(bbox, Self::zoom(resolution))
    }
}

/// Outcome of a coverage search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    /// Every tile at the target resolution that intersects the geometry.
    Complete(Vec<TileId>),
    /// The cap was reached after `emitted` tiles and the result was dropped.
    Overflow { emitted: usize },
}

impl Coverage {
    pub fn is_overflow(&self) -> bool {
        matches!(self, Coverage::Overflow { .. })
    }

    /// The emitted tiles; empty after an overflow.
    pub fn into_tiles(self) -> Vec<TileId> {
        match self {
            Coverage::Complete(tiles) => tiles,
            Coverage::Overflow { .. } => Vec::new(),
        }
    }
}

/// Find every tile at `max_depth` whose box intersects `geometry`.
///
/// A point resolves directly to the tile holding it. Anything else is
/// searched from the scheme's roots; geometry failures inside one branch only
/// prune that branch.
///
/// # Errors
///
/// `TileError::InvalidResolution` when `max_depth` is outside
/// `1..=max_resolution`, `TileError::InvalidInput` for non-finite coordinates
/// or an invalid config, and any error raised while choosing the roots.
pub fn coverage_search<S: TilingScheme>(
    scheme: &S,
    geometry: &Geometry,
    max_depth: usize,
    config: &CoverageConfig,
) -> Result<Coverage> {
    validate_resolution(max_depth, scheme.max_resolution())?;
    validate_geometry(geometry)?;
    config.validate().map_err(TileError::InvalidInput)?;

    if let Geometry::Point(point) = geometry {
        let tile = scheme.tile_for_point(point.x(), point.y(), max_depth);
        return Ok(Coverage::Complete(vec![tile]));
    }

    let roots = scheme.search_roots(geometry, max_depth)?;
    let mut search = Search {
        scheme,
        max_depth,
        config,
        tiles: Vec::new(),
    };

    for root in &roots {
        if search.visit(root, geometry).is_break() {
            let emitted = search.tiles.len();
            log::warn!(
                "{} coverage at resolution {} reached the cap of {} tiles, dropping result",
                S::NAME,
                max_depth,
                config.max_tiles
            );
            return Ok(Coverage::Overflow { emitted });
        }
    }

    log::debug!(
        "{} coverage at resolution {}: {} tiles from {} roots",
        S::NAME,
        max_depth,
        search.tiles.len(),
        roots.len()
    );
    Ok(Coverage::Complete(search.tiles))
}

/// Children of `tile` whose box intersects `geometry`.
pub fn children_containing<S: TilingScheme>(
    scheme: &S,
    geometry: &Geometry,
    tile: &str,
) -> Result<Vec<TileId>> {
    let mut found = Vec::new();
    for child in scheme.children_of(tile) {
        let bbox = scheme.bounding_box_of(&child)?;
        if geometry::relate_box(geometry, &bbox)?.intersects {
            found.push(child);
        }
    }
    Ok(found)
}

struct Search<'a, S> {
    scheme: &'a S,
    max_depth: usize,
    config: &'a CoverageConfig,
    tiles: Vec<TileId>,
}

impl<S: TilingScheme> Search<'_, S> {
    fn visit(&mut self, tile: &str, geometry: &Geometry) -> ControlFlow<()> {
        let bbox = match self.scheme.bounding_box_of(tile) {
            Ok(bbox) => bbox,
            Err(e) => {
                log::warn!("Pruning {} tile {:?}: {}", S::NAME, tile, e);
                return ControlFlow::Continue(());
            }
        };

        let relation = match geometry::relate_box(geometry, &bbox) {
            Ok(relation) => relation,
            Err(e) => {
                log::warn!("Pruning {} tile {:?}: {}", S::NAME, tile, e);
                return ControlFlow::Continue(());
            }
        };
        if !relation.intersects {
            return ControlFlow::Continue(());
        }

        if self.scheme.resolution_of(tile) >= self.max_depth {
            return self.emit(tile.to_string());
        }

        if self.config.shortcut_covered && relation.covers {
            return self.emit_descendants(tile);
        }

        let clipped = match geometry::clip_to_box(geometry, &bbox) {
            Ok(clipped) => clipped,
            Err(e) => {
                log::warn!("Pruning {} tile {:?}: {}", S::NAME, tile, e);
                return ControlFlow::Continue(());
            }
        };
        let clipped = clipped.map(|clipped| {
            if self.config.collapse_multipart {
                geometry::collapse_multi_part(clipped)
            } else {
                clipped
            }
        });
        // An empty clip of an intersecting geometry means it only touches the
        // box along an edge or at a corner. Children on that edge still count.
        let next = clipped.as_ref().unwrap_or(geometry);

        for child in self.scheme.children_of(tile) {
            self.visit(&child, next)?;
        }
        ControlFlow::Continue(())
    }

    /// Every descendant at the target resolution, without geometric tests.
    fn emit_descendants(&mut self, tile: &str) -> ControlFlow<()> {
        if self.scheme.resolution_of(tile) >= self.max_depth {
            return self.emit(tile.to_string());
        }
        for child in self.scheme.children_of(tile) {
            self.emit_descendants(&child)?;
        }
        ControlFlow::Continue(())
    }

    fn emit(&mut self, tile: TileId) -> ControlFlow<()> {
        if self.tiles.len() >= self.config.max_tiles {
            return ControlFlow::Break(());
        }
        self.tiles.push(tile);
        ControlFlow::Continue(())
    }
}
