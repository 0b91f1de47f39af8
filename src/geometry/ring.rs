use crate::domain::{Coordinate, Polygon};

/// Boundary ring for rendering: the polygon's vertices with the first one
/// repeated at the end.
///
/// Containment never needs this; it treats the ring as implicitly closed.
pub fn close_ring(polygon: &Polygon) -> Vec<Coordinate> {
    let mut ring = polygon.vertices().to_vec();
    if let (Some(&first), Some(&last)) = (ring.first(), ring.last())
        && first != last
    {
        ring.push(first);
    }
    ring
}

/// Segment from the last drawn vertex back to the first
pub fn connector(polygon: &Polygon) -> Option<[Coordinate; 2]> {
    let vertices = polygon.vertices();
    match (vertices.last(), vertices.first()) {
        (Some(&last), Some(&first)) if vertices.len() > 1 => Some([last, first]),
        _ => None,
    }
}
