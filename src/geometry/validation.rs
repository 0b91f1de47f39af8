//! Polygon validity checks
//!
//! A drawn ring is queryable when every vertex is a finite, in-range
//! coordinate, it has at least three vertices, at least three of them
//! distinct, and not all of them on one line. Anything else has an empty
//! interior.

use crate::domain::{Coordinate, Polygon};

/// Why a drawn polygon cannot be queried
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidPolygonError {
    #[error("polygon vertex {index} is not a valid coordinate")]
    InvalidVertex { index: usize },
    #[error("polygon needs at least 3 vertices, got {count}")]
    TooFewVertices { count: usize },
    #[error("polygon needs at least 3 distinct vertices, got {distinct}")]
    TooFewDistinctVertices { distinct: usize },
    #[error("all {count} polygon vertices are collinear")]
    Collinear { count: usize },
}

/// Validate a polygon for containment queries
pub fn validate(polygon: &Polygon) -> Result<(), InvalidPolygonError> {
    if let Some(index) = polygon.vertices().iter().position(|v| !v.is_valid()) {
        return Err(InvalidPolygonError::InvalidVertex { index });
    }

    let count = polygon.len();
    if count < 3 {
        return Err(InvalidPolygonError::TooFewVertices { count });
    }

    let distinct = distinct_vertices(polygon.vertices(), 3);
    if distinct < 3 {
        return Err(InvalidPolygonError::TooFewDistinctVertices { distinct });
    }

    if is_collinear(polygon.vertices()) {
        return Err(InvalidPolygonError::Collinear { count });
    }

    Ok(())
}

/// Check if a polygon has an empty interior
pub fn is_degenerate(polygon: &Polygon) -> bool {
    validate(polygon).is_err()
}

/// Count distinct vertices, stopping early once `limit` is reached
fn distinct_vertices(vertices: &[Coordinate], limit: usize) -> usize {
    let mut seen: Vec<Coordinate> = Vec::with_capacity(limit);
    for v in vertices {
        if !seen.contains(v) {
            seen.push(*v);
            if seen.len() >= limit {
                break;
            }
        }
    }
    seen.len()
}

/// Check if every vertex lies on the line through the first two distinct ones
fn is_collinear(vertices: &[Coordinate]) -> bool {
    let Some(&a) = vertices.first() else {
        return true;
    };
    let Some(&b) = vertices.iter().find(|v| **v != a) else {
        return true;
    };

    vertices.iter().all(|p| {
        (b.lon - a.lon) * (p.lat - a.lat) - (b.lat - a.lat) * (p.lon - a.lon) == 0.0
    })
}
