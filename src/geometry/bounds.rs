use geo::{BoundingRect, Intersects, Rect};

use crate::domain::{Coordinate, Polygon};

/// Axis-aligned bounding box in degrees (x = longitude, y = latitude)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    rect: Rect<f64>,
}

impl BoundingBox {
    /// Create bounds from a set of points
    pub fn from_points(points: &[Coordinate]) -> Option<Self> {
        let line: geo::LineString<f64> =
            points.iter().map(|&c| geo::Coord::<f64>::from(c)).collect();
        line.bounding_rect().map(|rect| Self { rect })
    }

    pub fn from_polygon(polygon: &Polygon) -> Option<Self> {
        Self::from_points(polygon.vertices())
    }

    /// Inclusive test, so points on the polygon boundary always pass
    pub fn contains(&self, point: Coordinate) -> bool {
        let min = self.rect.min();
        let max = self.rect.max();
        point.lon >= min.x && point.lon <= max.x && point.lat >= min.y && point.lat <= max.y
    }

    pub fn south_west(&self) -> Coordinate {
        self.rect.min().into()
    }

    pub fn north_east(&self) -> Coordinate {
        self.rect.max().into()
    }

    /// Check if two boxes overlap, touching edges included
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.rect.intersects(&other.rect)
    }
}
