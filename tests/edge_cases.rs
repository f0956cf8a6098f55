use geo::{Geometry, MultiPoint, MultiPolygon, Point, Rect, coord};
use tilecover::prelude::*;
use tilecover::{grid, pyramid};

/// Test 1: Adjacency across the anti-meridian and at the poles
#[test]
fn test_adjacency_at_map_edges() {
    let east_edge = grid::compute(179.9, 0.5, 4);
    let wrapped = grid::adjacent(&east_edge, Direction::East).unwrap().unwrap();
    assert_eq!(wrapped, grid::compute(-179.9, 0.5, 4));

    let top = grid::compute(0.5, 89.95, 4);
    assert_eq!(grid::adjacent(&top, Direction::North).unwrap(), None);

    let key = pyramid::geo_point_to_quad_key(179.9, 0.5, 4);
    let wrapped = pyramid::adjacent(&key, Direction::East).unwrap().unwrap();
    assert_eq!(wrapped, pyramid::geo_point_to_quad_key(-179.9, 0.5, 4));

    let top = pyramid::geo_point_to_quad_key(0.5, 85.0, 4);
    assert_eq!(pyramid::adjacent(&top, Direction::North).unwrap(), None);
}

/// Test 2: Out-of-range coordinates are clamped, not rejected
#[test]
fn test_out_of_range_coordinates_clamp() {
    assert_eq!(grid::compute(200.0, 100.0, 3), grid::compute(180.0, 90.0, 3));
    assert_eq!(
        pyramid::geo_point_to_quad_key(0.5, 89.0, 6),
        pyramid::geo_point_to_quad_key(0.5, pyramid::MAX_LATITUDE, 6)
    );
}

/// Test 3: Malformed tile ids
#[test]
fn test_invalid_tile_ids() {
    match grid::compute_box("c0z") {
        Err(TileError::InvalidTileId { character, .. }) => assert_eq!(character, 'z'),
        other => panic!("unexpected result: {:?}", other),
    }
    match pyramid::quad_key_to_box("014") {
        Err(TileError::InvalidTileId { character, .. }) => assert_eq!(character, '4'),
        other => panic!("unexpected result: {:?}", other),
    }

    let message = pyramid::quad_key_to_box("014").unwrap_err().to_string();
    assert!(message.contains("quadkey"));
    assert!(message.contains("014"));
}

/// Test 4: Deepest resolution
#[test]
fn test_max_resolution_points() {
    let nyc: Geometry = Point::new(-74.0060, 40.7128).into();
    let config = CoverageConfig::default();

    let cells = coverage_search(&GridScheme, &nyc, 23, &config).unwrap().into_tiles();
    assert_eq!(cells[0].len(), 23);
    let keys = coverage_search(&PyramidScheme, &nyc, 23, &config).unwrap().into_tiles();
    assert_eq!(keys[0].len(), 23);

    assert!(coverage_search(&GridScheme, &nyc, 24, &config).is_err());
}

/// Test 5: Empty geometry covers nothing
#[test]
fn test_empty_geometry() {
    let empty: Geometry = MultiPolygon::new(vec![]).into();
    let config = CoverageConfig::default();

    let result = coverage_search(&GridScheme, &empty, 5, &config).unwrap();
    assert_eq!(result, Coverage::Complete(vec![]));
    assert!(tiles_for_geometry(&PyramidScheme, &empty, 5, &config).unwrap().is_empty());
}

/// Test 6: Geometry beyond the Mercator latitude limit
#[test]
fn test_polar_cap_has_no_quadkeys() {
    let cap: Geometry = Rect::new(coord! { x: -10.0, y: 86.0 }, coord! { x: 10.0, y: 89.0 }).into();
    let config = CoverageConfig::default();

    let keys = coverage_search(&PyramidScheme, &cap, 5, &config).unwrap().into_tiles();
    assert!(keys.is_empty());

    let cells = coverage_search(&GridScheme, &cap, 3, &config).unwrap().into_tiles();
    assert!(!cells.is_empty());
}

/// Test 7: Multi-point inputs reach every member's tile
#[test]
fn test_multipoint_coverage() {
    let points: Geometry =
        MultiPoint::from(vec![Point::new(-74.0060, 40.7128), Point::new(-0.1278, 51.5074)]).into();
    let cells = coverage_search(&GridScheme, &points, 6, &CoverageConfig::default())
        .unwrap()
        .into_tiles();

    assert!(cells.contains(&grid::compute(-74.0060, 40.7128, 6)));
    assert!(cells.contains(&grid::compute(-0.1278, 51.5074, 6)));
}

/// Test 8: Non-finite input
#[test]
fn test_non_finite_point_rejected() {
    let bad: Geometry = Point::new(f64::NAN, 0.0).into();
    let config = CoverageConfig::default();
    assert!(matches!(
        coverage_search(&PyramidScheme, &bad, 5, &config),
        Err(TileError::InvalidInput(_))
    ));
    assert!(tilecover::validation::validate_geographic_point(&Point::new(0.0, f64::INFINITY)).is_err());
}

/// Test 9: Lines along tile borders still reach the tiles on both sides
#[test]
fn test_line_on_equator() {
    let equator: Geometry = geo::LineString::from(vec![(10.0, 0.0), (30.0, 0.0)]).into();
    let config = CoverageConfig::default();

    let keys = tiles_for_geometry(&PyramidScheme, &equator, 5, &config).unwrap();
    assert!(keys.contains(&pyramid::geo_point_to_quad_key(20.0, 0.0, 5)));
    assert!(keys.contains(&pyramid::geo_point_to_quad_key(20.0, 1.0, 5)));

    let cells = tiles_for_geometry(&GridScheme, &equator, 4, &config).unwrap();
    assert!(cells.contains(&grid::compute(20.0, 0.0, 4)));
    assert!(cells.contains(&grid::compute(20.0, -0.5, 4)));
}

/// Test 10: Point features off the map are rejected by dispatch
#[test]
fn test_dispatch_rejects_point_off_map() {
    let stray: Geometry = Point::new(0.0, -95.0).into();
    assert!(matches!(
        tiles_for_geometry(&GridScheme, &stray, 3, &CoverageConfig::default()),
        Err(TileError::InvalidInput(_))
    ));
}
