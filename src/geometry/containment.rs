//! Point-in-polygon test over an implicitly closed ring.
//!
//! Coordinates are treated as planar (longitude = x, latitude = y). That is
//! accurate enough for city-scale searches; no projection is applied.
//!
//! All predicates use the exact sign of double-precision cross products,
//! with no epsilon. Boundary rule: a point lying on an edge or on a vertex is
//! inside. A degenerate ring (fewer than three distinct vertices, or all
//! vertices collinear) has an empty interior and contains nothing.

use super::validation::is_degenerate;
use crate::domain::{Coordinate, Polygon};

/// Twice the signed area of triangle (o, a, b); positive when b is left of o→a
fn cross(o: Coordinate, a: Coordinate, b: Coordinate) -> f64 {
    (a.lon - o.lon) * (b.lat - o.lat) - (a.lat - o.lat) * (b.lon - o.lon)
}

/// Check if `p` lies on the closed segment a→b
pub fn on_segment(p: Coordinate, a: Coordinate, b: Coordinate) -> bool {
    cross(a, b, p) == 0.0
        && p.lon >= a.lon.min(b.lon)
        && p.lon <= a.lon.max(b.lon)
        && p.lat >= a.lat.min(b.lat)
        && p.lat <= a.lat.max(b.lat)
}

/// Check if a point lies on any edge of the ring, vertices included
pub fn on_boundary(point: Coordinate, polygon: &Polygon) -> bool {
    polygon.edges().any(|(a, b)| on_segment(point, a, b))
}

/// Even-odd ray casting towards +x, boundary inclusive.
///
/// Self-intersecting rings are not rejected; they get whatever the even-odd
/// rule yields.
pub fn point_in_polygon(point: Coordinate, polygon: &Polygon) -> bool {
    if is_degenerate(polygon) {
        return false;
    }
    contains_in_valid_ring(point, polygon)
}

/// Ray casting without the degeneracy check, for callers that already
/// validated the ring once
pub(crate) fn contains_in_valid_ring(point: Coordinate, polygon: &Polygon) -> bool {
    if on_boundary(point, polygon) {
        return true;
    }

    let mut inside = false;
    for (a, b) in polygon.edges() {
        // Half-open rule on latitude so a ray through a vertex counts once
        if (a.lat > point.lat) != (b.lat > point.lat) {
            let side = cross(a, b, point);
            let crosses = if b.lat > a.lat { side > 0.0 } else { side < 0.0 };
            if crosses {
                inside = !inside;
            }
        }
    }
    inside
}
