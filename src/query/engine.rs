use serde::Serialize;

use crate::domain::{Coordinate, Feature, Polygon};
use crate::geometry::containment::contains_in_valid_ring;
use crate::geometry::{BoundingBox, InvalidPolygonError, close_ring, connector, validate};
use crate::store::FeatureStore;

/// Default title for a listing marker before a street address is known
pub const LISTING_TITLE: &str = "Listing";

/// A listing that fell inside the drawn polygon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Index of the feature in the store's load order
    pub index: usize,
    pub feature: Feature,
}

/// Renderable marker for a matched listing
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListingAnnotation {
    pub index: usize,
    pub coordinate: Coordinate,
    pub title: String,
    pub subtitle: String,
}

/// Outcome of one containment query
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    /// Matches in store order
    pub matches: Vec<Match>,
    /// Closed outline of the drawn polygon
    pub boundary: Vec<Coordinate>,
    /// Last drawn vertex back to the first, for visual closure
    pub connector: [Coordinate; 2],
}

impl QueryResult {
    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    pub fn features(&self) -> impl Iterator<Item = &Feature> {
        self.matches.iter().map(|m| &m.feature)
    }

    /// Build one marker per match: generic title, price label as subtitle
    pub fn annotations(&self) -> Vec<ListingAnnotation> {
        self.matches
            .iter()
            .map(|m| ListingAnnotation {
                index: m.index,
                coordinate: m.feature.coordinate,
                title: LISTING_TITLE.to_string(),
                subtitle: m.feature.price_label(),
            })
            .collect()
    }
}

/// Find every listing inside `polygon`.
///
/// # Algorithm
/// 1. Reject polygons with fewer than 3 vertices or an empty interior
/// 2. Skip the scan entirely when the polygon's bounding box misses the
///    store's extent
/// 3. Skip features outside the polygon's bounding box (inclusive, so it
///    never changes the outcome)
/// 4. Ray-cast each remaining feature, boundary counts as inside
/// 5. Derive the closed boundary ring and the connector segment
///
/// A rejected polygon comes back as an error, never as an empty match list,
/// so callers can tell a bad drawing from an empty area.
pub fn query(polygon: &Polygon, store: &FeatureStore) -> Result<QueryResult, InvalidPolygonError> {
    validate(polygon)?;

    let bounds = BoundingBox::from_polygon(polygon);
    let disjoint = match (bounds, store.bounds()) {
        (Some(area), Some(extent)) => !area.intersects(&extent),
        _ => false,
    };

    let matches: Vec<Match> = if disjoint {
        log::debug!("Polygon lies outside the listing extent, skipping scan");
        Vec::new()
    } else {
        store
            .all_features()
            .enumerate()
            .filter(|(_, f)| bounds.is_none_or(|b| b.contains(f.coordinate)))
            .filter(|(_, f)| contains_in_valid_ring(f.coordinate, polygon))
            .map(|(index, feature)| Match {
                index,
                feature: feature.clone(),
            })
            .collect()
    };

    log::debug!(
        "Query over {} vertices matched {} of {} listings",
        polygon.len(),
        matches.len(),
        store.len()
    );

    let boundary = close_ring(polygon);
    let connector = connector(polygon).ok_or(InvalidPolygonError::TooFewVertices {
        count: polygon.len(),
    })?;

    Ok(QueryResult {
        matches,
        boundary,
        connector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::point_in_polygon;

    /// Planar helper: x is longitude, y is latitude
    fn xy(x: f64, y: f64) -> Coordinate {
        Coordinate::new(y, x)
    }

    fn store_with_points(points: &[(f64, f64)]) -> FeatureStore {
        let features: Vec<String> = points
            .iter()
            .enumerate()
            .map(|(i, (x, y))| {
                format!(
                    r#"{{"type":"Feature","geometry":{{"type":"Point","coordinates":[{},{}]}},"properties":{{"price":{}}}}}"#,
                    x,
                    y,
                    (i + 1) * 100
                )
            })
            .collect();
        let json = format!(
            r#"{{"type":"FeatureCollection","features":[{}]}}"#,
            features.join(",")
        );
        FeatureStore::load(&json).unwrap()
    }

    fn square() -> Polygon {
        Polygon::new(vec![xy(0.0, 0.0), xy(0.0, 10.0), xy(10.0, 10.0), xy(10.0, 0.0)])
    }

    #[test]
    fn test_square_scenario() {
        let store = store_with_points(&[(5.0, 5.0), (15.0, 5.0), (0.0, 5.0)]);
        let result = query(&square(), &store).unwrap();

        let indices: Vec<usize> = result.matches.iter().map(|m| m.index).collect();
        assert_eq!(indices, vec![0, 2]);
    }

    #[test]
    fn test_query_idempotent() {
        let store = store_with_points(&[
            (1.0, 1.0),
            (20.0, 1.0),
            (9.0, 9.0),
            (10.0, 10.0),
            (3.0, -1.0),
        ]);
        let polygon = square();

        let first = query(&polygon, &store).unwrap();
        let second = query(&polygon, &store).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_two_point_polygon_rejected() {
        let store = store_with_points(&[(0.5, 0.5)]);
        let polygon = Polygon::new(vec![xy(0.0, 0.0), xy(1.0, 1.0)]);

        assert_eq!(
            query(&polygon, &store),
            Err(InvalidPolygonError::TooFewVertices { count: 2 })
        );
    }

    #[test]
    fn test_degenerate_polygons_rejected() {
        let store = store_with_points(&[(0.0, 0.0)]);

        let identical = Polygon::new(vec![xy(0.0, 0.0), xy(0.0, 0.0), xy(0.0, 0.0)]);
        assert!(query(&identical, &store).is_err());

        let zigzag = Polygon::new(vec![xy(0.0, 0.0), xy(1.0, 0.0), xy(0.0, 0.0), xy(1.0, 0.0)]);
        assert_eq!(
            query(&zigzag, &store),
            Err(InvalidPolygonError::TooFewDistinctVertices { distinct: 2 })
        );

        let line = Polygon::new(vec![xy(0.0, 0.0), xy(1.0, 0.0), xy(2.0, 0.0)]);
        assert_eq!(
            query(&line, &store),
            Err(InvalidPolygonError::Collinear { count: 3 })
        );
    }

    #[test]
    fn test_invalid_vertex_is_an_error_not_an_empty_result() {
        let store = store_with_points(&[(5.0, 5.0), (50.0, 5.0)]);

        let with_nan =
            Polygon::new(vec![xy(0.0, 0.0), xy(10.0, 0.0), xy(10.0, 10.0), xy(f64::NAN, 0.0)]);
        assert_eq!(
            query(&with_nan, &store),
            Err(InvalidPolygonError::InvalidVertex { index: 3 })
        );

        let out_of_range = Polygon::new(vec![xy(0.0, 0.0), xy(900.0, 0.0), xy(900.0, 500.0)]);
        assert_eq!(
            query(&out_of_range, &store),
            Err(InvalidPolygonError::InvalidVertex { index: 1 })
        );
    }

    #[test]
    fn test_empty_store_is_not_an_error() {
        let store = FeatureStore::load(r#"{"type":"FeatureCollection","features":[]}"#).unwrap();
        let result = query(&square(), &store).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_polygon_outside_listing_extent() {
        let store = store_with_points(&[(5.0, 5.0), (6.0, 7.0)]);
        let far = Polygon::new(vec![xy(50.0, 50.0), xy(60.0, 50.0), xy(60.0, 60.0)]);

        let result = query(&far, &store).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.boundary.len(), 4);

        // Touching the extent at a single corner still matches that listing
        let corner = Polygon::new(vec![xy(6.0, 7.0), xy(9.0, 7.0), xy(9.0, 9.0)]);
        let indices: Vec<usize> = query(&corner, &store)
            .unwrap()
            .matches
            .iter()
            .map(|m| m.index)
            .collect();
        assert_eq!(indices, vec![1]);
    }

    #[test]
    fn test_boundary_and_connector() {
        let store = store_with_points(&[]);
        let polygon = square();
        let result = query(&polygon, &store).unwrap();

        assert_eq!(result.boundary.len(), 5);
        assert_eq!(result.boundary[0], result.boundary[4]);
        assert_eq!(result.connector, [xy(10.0, 0.0), xy(0.0, 0.0)]);
        // Input is not modified
        assert_eq!(polygon.len(), 4);
    }

    #[test]
    fn test_annotations() {
        let store = store_with_points(&[(5.0, 5.0), (6.0, 6.0)]);
        let result = query(&square(), &store).unwrap();
        let annotations = result.annotations();

        assert_eq!(annotations.len(), 2);
        assert_eq!(annotations[0].title, LISTING_TITLE);
        assert_eq!(annotations[0].subtitle, "$100");
        assert_eq!(annotations[1].subtitle, "$200");
        assert_eq!(annotations[1].coordinate, xy(6.0, 6.0));
    }

    #[test]
    fn test_prefilter_matches_full_scan() {
        let points: Vec<(f64, f64)> = (0..15)
            .flat_map(|i| (0..15).map(move |j| (i as f64 - 2.0, j as f64 - 2.0)))
            .collect();
        let store = store_with_points(&points);
        let triangle = Polygon::new(vec![xy(0.0, 0.0), xy(10.0, 0.0), xy(0.0, 10.0)]);

        let result = query(&triangle, &store).unwrap();
        let full_scan: Vec<usize> = store
            .all_features()
            .enumerate()
            .filter(|(_, f)| point_in_polygon(f.coordinate, &triangle))
            .map(|(i, _)| i)
            .collect();
        let indices: Vec<usize> = result.matches.iter().map(|m| m.index).collect();

        assert_eq!(indices, full_scan);
        // 11 + 10 + ... + 1 lattice points inside or on the triangle
        assert_eq!(indices.len(), 66);
    }
}
