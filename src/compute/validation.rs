//! Validation for coordinates and resolutions.

use crate::error::{Result, TileError};
use geo::Point;

/// Checks that a point lies on the lon/lat map: longitude in [-180, 180] and
/// latitude in [-90, 90]. NaN fails both ranges.
///
/// # Examples
///
/// ```
/// use tilecover::validation::validate_geographic_point;
/// use geo::Point;
///
/// assert!(validate_geographic_point(&Point::new(-74.0060, 40.7128)).is_ok());
/// assert!(validate_geographic_point(&Point::new(200.0, 40.0)).is_err());
/// assert!(validate_geographic_point(&Point::new(-74.0, f64::NAN)).is_err());
/// ```
pub fn validate_geographic_point(point: &Point) -> Result<()> {
    let (lon, lat) = (point.x(), point.y());
    if (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat) {
        return Ok(());
    }
    Err(TileError::InvalidInput(format!(
        "Point ({}, {}) is off the map [-180, 180] x [-90, 90]",
        lon, lat
    )))
}

/// Validates that `resolution` lies in `1..=max`.
///
/// # Examples
///
/// ```
/// use tilecover::validation::validate_resolution;
///
/// assert!(validate_resolution(13, 23).is_ok());
/// assert!(validate_resolution(0, 23).is_err());
/// assert!(validate_resolution(24, 23).is_err());
/// ```
pub fn validate_resolution(resolution: usize, max: usize) -> Result<()> {
    if resolution == 0 || resolution > max {
        return Err(TileError::InvalidResolution { resolution, max });
    }
    Ok(())
}

/// Validates every coordinate of a geometry is finite.
///
/// Coordinates outside the lon/lat range are allowed: the tiling schemes
/// clamp them, but NaN and infinities make every predicate meaningless.
pub fn validate_geometry(geometry: &geo::Geometry) -> Result<()> {
    use geo::CoordsIter;

    for (idx, coord) in geometry.coords_iter().enumerate() {
        if !coord.x.is_finite() || !coord.y.is_finite() {
            return Err(TileError::InvalidInput(format!(
                "Coordinate at index {} is not finite: ({}, {})",
                idx, coord.x, coord.y
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Geometry, LineString, point};

    #[test]
    fn test_validate_edges() {
        assert!(validate_geographic_point(&point!(x: 180.0, y: 90.0)).is_ok());
        assert!(validate_geographic_point(&point!(x: -180.0, y: -90.0)).is_ok());
        assert!(validate_geographic_point(&point!(x: 0.0, y: 90.1)).is_err());
    }

    #[test]
    fn test_validate_resolution_error_carries_bounds() {
        match validate_resolution(30, 23) {
            Err(TileError::InvalidResolution { resolution, max }) => {
                assert_eq!(resolution, 30);
                assert_eq!(max, 23);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_validate_geometry_rejects_nan() {
        let ok: Geometry = LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]).into();
        let bad: Geometry = LineString::from(vec![(0.0, 0.0), (f64::INFINITY, 1.0)]).into();
        assert!(validate_geometry(&ok).is_ok());
        assert!(validate_geometry(&bad).is_err());
    }
}
