use geo::{Point, Polygon, Rect};
use serde::{Deserialize, Serialize};

/// An axis-aligned extent in degrees.
///
/// Every tile identifier maps to exactly one `BoundingBox`. This is a thin
/// wrapper around `geo::Rect` that names the sides the way map tiles do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// The underlying geometric rectangle
    pub rect: Rect,
}

impl BoundingBox {
    /// Create a new bounding box from its four sides.
    ///
    /// # Arguments
    ///
    /// * `west` - Minimum longitude
    /// * `south` - Minimum latitude
    /// * `east` - Maximum longitude
    /// * `north` - Maximum latitude
    ///
    /// # Examples
    ///
    /// ```
    /// use tilecover_types::bbox::BoundingBox;
    ///
    /// let bbox = BoundingBox::new(-74.0, 40.7, -73.9, 40.8);
    /// assert_eq!(bbox.west(), -74.0);
    /// assert_eq!(bbox.north(), 40.8);
    /// ```
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            rect: Rect::new(
                geo::coord! { x: west, y: south },
                geo::coord! { x: east, y: north },
            ),
        }
    }

    /// The full lon/lat extent: (-180, -90) to (180, 90).
    pub fn whole_earth() -> Self {
        Self::new(-180.0, -90.0, 180.0, 90.0)
    }

    /// Create a bounding box from a `geo::Rect`.
    pub fn from_rect(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    /// Longitudinal span in degrees.
    pub fn width(&self) -> f64 {
        self.east() - self.west()
    }

    /// Latitudinal span in degrees.
    pub fn height(&self) -> f64 {
        self.north() - self.south()
    }

    /// Check if a point lies inside or on the edge of this box.
    pub fn contains_point(&self, point: &Point) -> bool {
        point.x() >= self.west()
            && point.x() <= self.east()
            && point.y() >= self.south()
            && point.y() <= self.north()
    }

    /// Check if `other` lies entirely inside this box (edges included).
    pub fn contains_box(&self, other: &BoundingBox) -> bool {
        other.west() >= self.west()
            && other.east() <= self.east()
            && other.south() >= self.south()
            && other.north() <= self.north()
    }

    /// The box as a closed polygon ring.
    pub fn to_polygon(&self) -> Polygon {
        self.rect.to_polygon()
    }
}

impl From<Rect> for BoundingBox {
    fn from(rect: Rect) -> Self {
        Self::from_rect(rect)
    }
}
