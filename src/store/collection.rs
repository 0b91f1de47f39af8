use std::path::{Path, PathBuf};

use serde_json::Value;

use super::geojson::{DropReason, RawCollection, convert_feature};
use crate::domain::Feature;
use crate::geometry::BoundingBox;

/// Error type for loading the listing collection.
///
/// Any of these aborts store construction; there is no partial load.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("failed to read listings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("expected a FeatureCollection, found type {0:?}")]
    NotFeatureCollection(String),
    #[error("FeatureCollection has no features array")]
    MissingFeatures,
}

/// A feature record that was skipped during load
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedFeature {
    /// Position in the source `features` array
    pub index: usize,
    pub reason: DropReason,
}

/// Outcome of a load, surfaced to the caller
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    pub loaded: usize,
    pub dropped: Vec<DroppedFeature>,
}

impl LoadReport {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }

    pub fn summary(&self) -> String {
        if self.dropped.is_empty() {
            format!("Loaded {} listings", self.loaded)
        } else {
            format!(
                "Loaded {} listings, dropped {} invalid records",
                self.loaded,
                self.dropped.len()
            )
        }
    }
}

/// Immutable listing dataset, loaded once and queried many times
#[derive(Debug, Clone)]
pub struct FeatureStore {
    features: Vec<Feature>,
    bounds: Option<BoundingBox>,
    report: LoadReport,
}

impl FeatureStore {
    /// Parse a GeoJSON FeatureCollection.
    ///
    /// Fails if the text is not JSON or the top level is not a
    /// FeatureCollection with a `features` array. Individual records that are
    /// not usable Point listings are dropped and recorded in the report.
    pub fn load(source: &str) -> Result<Self, ParseError> {
        let raw: Value = serde_json::from_str(source)?;
        let collection: RawCollection = serde_json::from_value(raw)?;

        if collection.type_ != "FeatureCollection" {
            return Err(ParseError::NotFeatureCollection(collection.type_));
        }

        let records = match collection.features {
            Some(Value::Array(records)) => records,
            _ => return Err(ParseError::MissingFeatures),
        };

        let mut features = Vec::with_capacity(records.len());
        let mut dropped = Vec::new();

        for (index, record) in records.into_iter().enumerate() {
            match convert_feature(record) {
                Ok(feature) => features.push(feature),
                Err(reason) => {
                    log::warn!("Dropping feature {}: {}", index, reason);
                    dropped.push(DroppedFeature { index, reason });
                }
            }
        }

        let coordinates: Vec<_> = features.iter().map(|f| f.coordinate).collect();
        let bounds = BoundingBox::from_points(&coordinates);

        let report = LoadReport {
            loaded: features.len(),
            dropped,
        };
        log::info!("{}", report.summary());

        Ok(Self {
            features,
            bounds,
            report,
        })
    }

    /// Read a UTF-8 GeoJSON file and parse it
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Read {} bytes from {:?}", contents.len(), path);
        Self::load(&contents)
    }

    /// All listings in load order.
    ///
    /// Borrowing the store, so every call starts a fresh pass.
    pub fn all_features(&self) -> std::slice::Iter<'_, Feature> {
        self.features.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Feature> {
        self.features.get(index)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Extent of all listings, `None` for an empty store
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn dropped_count(&self) -> usize {
        self.report.dropped_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinate, Price};

    const MIXED: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-104.99, 39.74]}, "properties": {"price": 1200}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-104.95, 39.75]}, "properties": {"price": "1,450"}},
            {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}, "properties": {"price": 5}},
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-105.02, 39.70]}, "properties": {"price": 990, "beds": 1}}
        ]
    }"#;

    #[test]
    fn test_load_drops_non_point() {
        let store = FeatureStore::load(MIXED).unwrap();

        assert_eq!(store.len(), 3);
        assert_eq!(store.all_features().count(), 3);
        assert_eq!(store.dropped_count(), 1);
        assert_eq!(store.report().dropped[0].index, 2);
        assert_eq!(
            store.report().dropped[0].reason,
            DropReason::NotPoint("Polygon".to_string())
        );
    }

    #[test]
    fn test_all_features_restartable() {
        let store = FeatureStore::load(MIXED).unwrap();

        let first: Vec<_> = store.all_features().collect();
        let second: Vec<_> = store.all_features().collect();
        assert_eq!(first, second);
        assert_eq!(first[1].price, Price::Text("1,450".to_string()));
    }

    #[test]
    fn test_properties_retained() {
        let store = FeatureStore::load(MIXED).unwrap();
        let last = store.get(2).unwrap();

        assert_eq!(last.coordinate, Coordinate::new(39.70, -105.02));
        assert_eq!(last.properties.len(), 2);
        assert_eq!(last.property("beds"), Some(&serde_json::json!(1)));
    }

    #[test]
    fn test_load_rejects_wrong_top_level() {
        let result = FeatureStore::load(r#"{"type": "Feature", "geometry": null}"#);
        assert!(matches!(result, Err(ParseError::NotFeatureCollection(t)) if t == "Feature"));
    }

    #[test]
    fn test_load_rejects_missing_features() {
        let result = FeatureStore::load(r#"{"type": "FeatureCollection"}"#);
        assert!(matches!(result, Err(ParseError::MissingFeatures)));

        let result = FeatureStore::load(r#"{"type": "FeatureCollection", "features": {}}"#);
        assert!(matches!(result, Err(ParseError::MissingFeatures)));
    }

    #[test]
    fn test_load_rejects_invalid_json() {
        assert!(matches!(FeatureStore::load("{"), Err(ParseError::Json(_))));
        assert!(matches!(FeatureStore::load("[1, 2]"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_empty_collection() {
        let store = FeatureStore::load(r#"{"type": "FeatureCollection", "features": []}"#).unwrap();
        assert!(store.is_empty());
        assert!(store.bounds().is_none());
        assert_eq!(store.report().summary(), "Loaded 0 listings");
    }

    #[test]
    fn test_bounds_cover_listings() {
        let store = FeatureStore::load(MIXED).unwrap();
        let bounds = store.bounds().unwrap();
        assert_eq!(bounds.south_west(), Coordinate::new(39.70, -105.02));
        assert_eq!(bounds.north_east(), Coordinate::new(39.75, -104.95));
    }
}
