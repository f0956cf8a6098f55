//! Routing geometries to tiles.
//!
//! These helpers sit on top of coverage search for callers that fan features
//! out over tiles: either straight to the tiles at a target resolution, or one
//! level at a time, carrying the clipped geometry along with each child.

use crate::compute::geometry;
use crate::compute::validation::{
    validate_geographic_point, validate_geometry, validate_resolution,
};
use crate::config::CoverageConfig;
use crate::coverage::{Coverage, TilingScheme, coverage_search};
use crate::error::Result;
use geo::Geometry;
use tilecover_types::{BoundingBox, TileId};

/// Tiles at `resolution` that a geometry touches.
///
/// Points map to the single tile holding them and must lie on the map; the
/// search itself clamps stray coordinates, but a feature outside the lon/lat
/// range is rejected here. For anything else the tile
/// count is estimated from the envelope first; a geometry whose estimate is
/// over the cap yields an empty list without searching, as does a search that
/// overflows.
///
/// ```rust
/// use tilecover::coverage::PyramidScheme;
/// use tilecover::dispatch::tiles_for_geometry;
/// use tilecover::CoverageConfig;
/// use geo::{Geometry, Point};
///
/// let nyc: Geometry = Point::new(-74.0060, 40.7128).into();
/// let tiles = tiles_for_geometry(&PyramidScheme, &nyc, 12, &CoverageConfig::default())?;
/// assert_eq!(tiles.len(), 1);
/// # Ok::<(), tilecover::TileError>(())
/// ```
pub fn tiles_for_geometry<S: TilingScheme>(
    scheme: &S,
    geometry: &Geometry,
    resolution: usize,
    config: &CoverageConfig,
) -> Result<Vec<TileId>> {
    validate_resolution(resolution, scheme.max_resolution())?;
    validate_geometry(geometry)?;

    if let Geometry::Point(point) = geometry {
        validate_geographic_point(point)?;
        return Ok(vec![scheme.tile_for_point(point.x(), point.y(), resolution)]);
    }

    let Some(env) = geometry::envelope(geometry) else {
        return Ok(Vec::new());
    };
    if exceeds_cap(scheme, &env, resolution, config) {
        return Ok(Vec::new());
    }

    coverage_search(scheme, geometry, resolution, config).map(Coverage::into_tiles)
}

/// One level of descent: each child of `tile` that the geometry touches,
/// paired with the part of the geometry inside it.
///
/// A point is passed unchanged to the child holding it and must lie on the
/// map. Other geometries are clipped per child, and multi-part clips are
/// replaced by their envelope when `config.collapse_multipart` is set. A child
/// the geometry only touches along an edge gets the geometry unchanged, since
/// clipping drops such contacts. Children whose clip fails are skipped.
pub fn search_children<S: TilingScheme>(
    scheme: &S,
    tile: &str,
    geometry: &Geometry,
    config: &CoverageConfig,
) -> Result<Vec<(TileId, Geometry)>> {
    let resolution = scheme.resolution_of(tile) + 1;
    validate_resolution(resolution, scheme.max_resolution())?;
    validate_geometry(geometry)?;

    if let Geometry::Point(point) = geometry {
        validate_geographic_point(point)?;
        let child = scheme.tile_for_point(point.x(), point.y(), resolution);
        return Ok(vec![(child, geometry.clone())]);
    }

    let Some(env) = geometry::envelope(geometry) else {
        return Ok(Vec::new());
    };
    if exceeds_cap(scheme, &env, resolution, config) {
        return Ok(Vec::new());
    }

    let mut pairs = Vec::new();
    for child in scheme.children_of(tile) {
        let bbox = scheme.bounding_box_of(&child)?;
        if !geometry::relate_box(geometry, &bbox)?.intersects {
            continue;
        }

        match geometry::clip_to_box(geometry, &bbox) {
            Ok(Some(clipped)) => {
                let clipped = if config.collapse_multipart {
                    geometry::collapse_multi_part(clipped)
                } else {
                    clipped
                };
                pairs.push((child, clipped));
            }
            Ok(None) => pairs.push((child, geometry.clone())),
            Err(e) => {
                log::warn!("Skipping {} tile {:?}: {}", S::NAME, child, e);
            }
        }
    }
    Ok(pairs)
}

fn exceeds_cap<S: TilingScheme>(
    scheme: &S,
    env: &BoundingBox,
    resolution: usize,
    config: &CoverageConfig,
) -> bool {
    let estimate = scheme.estimate_tile_count(env, resolution);
    if estimate > config.max_tiles as u64 {
        log::warn!(
            "Refusing {} search at resolution {}: about {} tiles, cap is {}",
            S::NAME,
            resolution,
            estimate,
            config.max_tiles
        );
        return true;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coverage::{GridScheme, PyramidScheme};
    use crate::error::TileError;
    use crate::{grid, pyramid};
    use geo::{LineString, Point, Rect, coord};

    #[test]
    fn test_point_goes_to_its_tile() {
        let nyc: Geometry = Point::new(-74.0060, 40.7128).into();
        let config = CoverageConfig::default();

        let cells = tiles_for_geometry(&GridScheme, &nyc, 9, &config).unwrap();
        assert_eq!(cells, vec![grid::compute(-74.0060, 40.7128, 9)]);

        let keys = tiles_for_geometry(&PyramidScheme, &nyc, 15, &config).unwrap();
        assert_eq!(keys, vec![pyramid::geo_point_to_quad_key(-74.0060, 40.7128, 15)]);
    }

    #[test]
    fn test_preflight_refuses_huge_geometry() {
        let world: Geometry =
            Rect::new(coord! { x: -180.0, y: -90.0 }, coord! { x: 180.0, y: 90.0 }).into();
        let tiles = tiles_for_geometry(&GridScheme, &world, 13, &CoverageConfig::default()).unwrap();
        assert!(tiles.is_empty());

        let small_cap = CoverageConfig::default().with_max_tiles(10);
        let area: Geometry =
            Rect::new(coord! { x: 0.1, y: 0.1 }, coord! { x: 89.9, y: 44.9 }).into();
        assert!(tiles_for_geometry(&GridScheme, &area, 2, &small_cap).unwrap().is_empty());
    }

    #[test]
    fn test_tiles_for_polygon_match_search() {
        let area: Geometry =
            Rect::new(coord! { x: 0.1, y: 0.1 }, coord! { x: 89.9, y: 44.9 }).into();
        let config = CoverageConfig::default();
        let tiles = tiles_for_geometry(&GridScheme, &area, 2, &config).unwrap();
        let searched = coverage_search(&GridScheme, &area, 2, &config).unwrap().into_tiles();
        assert_eq!(tiles, searched);
        assert_eq!(tiles.len(), 16);
    }

    #[test]
    fn test_search_children_point() {
        let point: Geometry = Point::new(10.0, 10.0).into();
        let pairs = search_children(&GridScheme, "c", &point, &CoverageConfig::default()).unwrap();
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].0, grid::compute(10.0, 10.0, 2));
        assert_eq!(pairs[0].1, point);
    }

    #[test]
    fn test_search_children_clips_to_child() {
        // Crosses the boundary between the two western columns of "c".
        let line: Geometry = LineString::from(vec![(10.0, 5.0), (30.0, 5.0)]).into();
        let pairs = search_children(&GridScheme, "c", &line, &CoverageConfig::default()).unwrap();

        let ids: Vec<&str> = pairs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&grid::compute(10.0, 5.0, 2).as_str()));
        assert!(ids.contains(&grid::compute(30.0, 5.0, 2).as_str()));

        for (id, clipped) in &pairs {
            let bbox = grid::compute_box(id).unwrap();
            let env = geometry::envelope(clipped).unwrap();
            assert!(env.west() >= bbox.west() - 1e-9, "{id} clip escapes its box");
            assert!(env.east() <= bbox.east() + 1e-9, "{id} clip escapes its box");
            assert!((env.north() - 5.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_point_off_the_map_is_rejected() {
        let stray: Geometry = Point::new(200.0, 10.0).into();
        let config = CoverageConfig::default();
        assert!(matches!(
            tiles_for_geometry(&GridScheme, &stray, 5, &config),
            Err(TileError::InvalidInput(_))
        ));
        assert!(matches!(
            search_children(&PyramidScheme, "0", &stray, &config),
            Err(TileError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_search_children_keeps_edge_contact() {
        // Runs along the equator, the shared edge of "1" and "3".
        let line: Geometry = LineString::from(vec![(10.0, 0.0), (30.0, 0.0)]).into();
        let pairs = search_children(&PyramidScheme, "", &line, &CoverageConfig::default()).unwrap();
        let ids: Vec<&str> = pairs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_search_children_at_max_resolution() {
        let line: Geometry = LineString::from(vec![(10.0, 5.0), (30.0, 5.0)]).into();
        let deepest = "0".repeat(pyramid::MAX_ZOOM as usize);
        assert!(search_children(&PyramidScheme, &deepest, &line, &CoverageConfig::default()).is_err());
    }

    #[test]
    fn test_search_children_from_root() {
        let line: Geometry = LineString::from(vec![(-20.0, 10.0), (20.0, 10.0)]).into();
        let pairs = search_children(&PyramidScheme, "", &line, &CoverageConfig::default()).unwrap();
        let ids: Vec<&str> = pairs.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["0", "1"]);
    }
}
