//! Geometry operations the tiling schemes need from the `geo` crate.
//!
//! Coverage search only ever asks a handful of questions about the input
//! geometry: how it relates to a tile box, what is left of it inside a tile
//! box, and where its envelope and centroid are. Everything here answers one
//! of those questions.

use crate::error::{Result, TileError};
use geo::{
    BooleanOps, BoundingRect, Centroid, Geometry, GeometryCollection, Intersects, Line,
    LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon, Relate,
};
use std::panic::{AssertUnwindSafe, catch_unwind};
use tilecover_types::bbox::BoundingBox;

/// How a geometry sits relative to a tile box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxRelation {
    /// The geometry and the box share at least one point.
    pub intersects: bool,
    /// Every point of the box lies in the geometry.
    pub covers: bool,
}

/// Relate a geometry to a tile box.
///
/// # Examples
///
/// ```rust
/// use tilecover::compute::geometry::relate_box;
/// use tilecover_types::bbox::BoundingBox;
/// use geo::{Geometry, Rect, coord};
///
/// let big: Geometry = Rect::new(coord! { x: -10.0, y: -10.0 }, coord! { x: 10.0, y: 10.0 }).into();
/// let relation = relate_box(&big, &BoundingBox::new(0.0, 0.0, 1.0, 1.0)).unwrap();
/// assert!(relation.intersects);
/// assert!(relation.covers);
/// ```
pub fn relate_box(geometry: &Geometry, bbox: &BoundingBox) -> Result<BoxRelation> {
    let tile = bbox.to_polygon();
    guarded("relate", || {
        let matrix = geometry.relate(&tile);
        BoxRelation {
            intersects: matrix.is_intersects(),
            covers: matrix.is_covers(),
        }
    })
}

/// True when the geometry lies strictly inside the box, touching none of its
/// edges, so that no neighboring box can intersect it.
///
/// The envelope's extremes are points of the geometry, so comparing them
/// against the box sides is exact.
pub fn box_contains(bbox: &BoundingBox, geometry: &Geometry) -> Result<bool> {
    let Some(env) = envelope(geometry) else {
        return Ok(false);
    };
    Ok(env.west() > bbox.west()
        && env.east() < bbox.east()
        && env.south() > bbox.south()
        && env.north() < bbox.north())
}

/// The part of `geometry` that falls inside `bbox`.
///
/// Returns `Ok(None)` when nothing is left. Polygonal parts are intersected
/// with the box, linear parts are clipped to it, and points are kept when they
/// touch it. Single-element results are unwrapped, so a multi-part result
/// really has several parts.
pub fn clip_to_box(geometry: &Geometry, bbox: &BoundingBox) -> Result<Option<Geometry>> {
    let tile = bbox.to_polygon();
    guarded("clip", || clip_unguarded(geometry, &tile))
}

/// The smallest box around the geometry, or `None` for an empty geometry.
pub fn envelope(geometry: &Geometry) -> Option<BoundingBox> {
    geometry.bounding_rect().map(BoundingBox::from_rect)
}

/// The envelope as a geometry. Degenerate envelopes become a point or a line
/// so that later predicates never see a zero-area polygon.
pub fn envelope_geometry(geometry: &Geometry) -> Option<Geometry> {
    let rect = geometry.bounding_rect()?;
    let (min, max) = (rect.min(), rect.max());

    let degenerate_x = min.x == max.x;
    let degenerate_y = min.y == max.y;
    Some(match (degenerate_x, degenerate_y) {
        (true, true) => Geometry::Point(Point::from(min)),
        (true, false) | (false, true) => Geometry::Line(Line::new(min, max)),
        (false, false) => Geometry::Polygon(rect.to_polygon()),
    })
}

pub fn centroid(geometry: &Geometry) -> Option<Point> {
    geometry.centroid()
}

/// True for results made of several parts: multi-geometries and collections.
pub fn is_multi_part(geometry: &Geometry) -> bool {
    matches!(
        geometry,
        Geometry::MultiPoint(_)
            | Geometry::MultiLineString(_)
            | Geometry::MultiPolygon(_)
            | Geometry::GeometryCollection(_)
    )
}

/// Replace a multi-part geometry with its envelope; anything else passes through.
pub fn collapse_multi_part(geometry: Geometry) -> Geometry {
    if !is_multi_part(&geometry) {
        return geometry;
    }
    envelope_geometry(&geometry).unwrap_or(geometry)
}

fn clip_unguarded(geometry: &Geometry, tile: &Polygon) -> Option<Geometry> {
    match geometry {
        Geometry::Point(point) => tile.intersects(point).then_some(Geometry::Point(*point)),
        Geometry::MultiPoint(points) => points_result(
            points
                .iter()
                .filter(|point| tile.intersects(*point))
                .copied()
                .collect(),
        ),
        Geometry::Line(line) => {
            let lines = MultiLineString::new(vec![LineString::new(vec![line.start, line.end])]);
            lines_result(tile.clip(&lines, false))
        }
        Geometry::LineString(line) => {
            lines_result(tile.clip(&MultiLineString::new(vec![line.clone()]), false))
        }
        Geometry::MultiLineString(lines) => lines_result(tile.clip(lines, false)),
        Geometry::Polygon(polygon) => polygons_result(polygon.intersection(tile)),
        Geometry::MultiPolygon(polygons) => polygons_result(polygons.intersection(tile)),
        Geometry::Rect(rect) => polygons_result(rect.to_polygon().intersection(tile)),
        Geometry::Triangle(triangle) => polygons_result(triangle.to_polygon().intersection(tile)),
        Geometry::GeometryCollection(collection) => {
            let mut parts: Vec<Geometry> = collection
                .iter()
                .filter_map(|part| clip_unguarded(part, tile))
                .collect();
            match parts.len() {
                0 => None,
                1 => parts.pop(),
                _ => Some(Geometry::GeometryCollection(GeometryCollection::from(parts))),
            }
        }
    }
}

fn points_result(mut points: Vec<Point>) -> Option<Geometry> {
    match points.len() {
        0 => None,
        1 => points.pop().map(Geometry::Point),
        _ => Some(Geometry::MultiPoint(MultiPoint::new(points))),
    }
}

fn lines_result(lines: MultiLineString) -> Option<Geometry> {
    let mut lines = lines.0;
    lines.retain(|line| line.0.len() > 1);
    match lines.len() {
        0 => None,
        1 => lines.pop().map(Geometry::LineString),
        _ => Some(Geometry::MultiLineString(MultiLineString::new(lines))),
    }
}

fn polygons_result(polygons: MultiPolygon) -> Option<Geometry> {
    let mut polygons = polygons.0;
    match polygons.len() {
        0 => None,
        1 => polygons.pop().map(Geometry::Polygon),
        _ => Some(Geometry::MultiPolygon(MultiPolygon::new(polygons))),
    }
}

/// Run a geometry-library call, turning a panic inside it into an error the
/// caller can handle locally.
fn guarded<T>(operation: &'static str, f: impl FnOnce() -> T) -> Result<T> {
    catch_unwind(AssertUnwindSafe(f)).map_err(|payload| {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown failure".to_string());
        TileError::Geometry(format!("{} failed: {}", operation, detail))
    })
}
