use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Coordinate, Feature, Price};

/// Raw top level of a GeoJSON document
#[derive(Debug, Deserialize)]
pub struct RawCollection {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub features: Option<Value>,
}

/// Why a feature record was left out of the store
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DropReason {
    #[error("malformed feature record: {0}")]
    Malformed(String),
    #[error("feature has no geometry")]
    MissingGeometry,
    #[error("expected Point geometry, found {0}")]
    NotPoint(String),
    #[error("invalid point position")]
    InvalidPosition,
    #[error("missing or unusable price property")]
    MissingPrice,
}

/// Turn a raw feature value into a typed listing.
///
/// # Algorithm
/// 1. Decode the record as a GeoJSON Feature
/// 2. Require a Point geometry with a finite, in-range `[lon, lat]` position
/// 3. Require a numeric or non-blank string `price` property
pub fn convert_feature(value: Value) -> Result<Feature, DropReason> {
    let feature = geojson::Feature::from_json_value(value)
        .map_err(|e| DropReason::Malformed(e.to_string()))?;

    let geometry = feature.geometry.ok_or(DropReason::MissingGeometry)?;
    let coordinate = match &geometry.value {
        geojson::Value::Point(position) => {
            parse_position(position).ok_or(DropReason::InvalidPosition)?
        }
        other => return Err(DropReason::NotPoint(geometry_type(other).to_string())),
    };

    let properties = feature.properties.unwrap_or_default();
    let price = properties
        .get("price")
        .and_then(Price::from_value)
        .ok_or(DropReason::MissingPrice)?;

    Ok(Feature::new(coordinate, price, properties))
}

/// Parse a GeoJSON position; extra elements such as altitude are ignored
fn parse_position(position: &[f64]) -> Option<Coordinate> {
    let lon = *position.first()?;
    let lat = *position.get(1)?;
    let coordinate = Coordinate::from_lon_lat(lon, lat);
    coordinate.is_valid().then_some(coordinate)
}

fn geometry_type(value: &geojson::Value) -> &'static str {
    match value {
        geojson::Value::Point(_) => "Point",
        geojson::Value::MultiPoint(_) => "MultiPoint",
        geojson::Value::LineString(_) => "LineString",
        geojson::Value::MultiLineString(_) => "MultiLineString",
        geojson::Value::Polygon(_) => "Polygon",
        geojson::Value::MultiPolygon(_) => "MultiPolygon",
        geojson::Value::GeometryCollection(_) => "GeometryCollection",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn point_feature(coordinates: Value, properties: Value) -> Value {
        json!({
            "type": "Feature",
            "geometry": {"type": "Point", "coordinates": coordinates},
            "properties": properties
        })
    }

    #[test]
    fn test_convert_point_feature() {
        let value = point_feature(json!([-104.98, 39.74]), json!({"price": 1450, "beds": 2}));

        let feature = convert_feature(value).unwrap();
        assert_eq!(feature.coordinate, Coordinate::new(39.74, -104.98));
        assert_eq!(feature.price, Price::Number(1450.0));
        assert_eq!(feature.property("beds"), Some(&json!(2)));
    }

    #[test]
    fn test_convert_rejects_polygon() {
        let value = json!({
            "type": "Feature",
            "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]},
            "properties": {"price": 10}
        });
        assert_eq!(
            convert_feature(value),
            Err(DropReason::NotPoint("Polygon".to_string()))
        );

        let line = json!({
            "type": "Feature",
            "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
            "properties": {"price": 10}
        });
        assert_eq!(
            convert_feature(line),
            Err(DropReason::NotPoint("LineString".to_string()))
        );
    }

    #[test]
    fn test_convert_rejects_bad_position() {
        let out_of_range = point_feature(json!([200.0, 39.0]), json!({"price": 10}));
        assert_eq!(convert_feature(out_of_range), Err(DropReason::InvalidPosition));

        let short = point_feature(json!([10.0]), json!({"price": 10}));
        assert!(convert_feature(short).is_err());
    }

    #[test]
    fn test_convert_requires_price() {
        let value = point_feature(json!([0.0, 0.0]), json!({"beds": 3}));
        assert_eq!(convert_feature(value), Err(DropReason::MissingPrice));

        let no_properties = point_feature(json!([0.0, 0.0]), Value::Null);
        assert_eq!(convert_feature(no_properties), Err(DropReason::MissingPrice));

        let null_geometry =
            json!({"type": "Feature", "geometry": null, "properties": {"price": 1}});
        assert_eq!(convert_feature(null_geometry), Err(DropReason::MissingGeometry));
    }

    #[test]
    fn test_convert_malformed_record() {
        let result = convert_feature(json!("not a feature"));
        assert!(matches!(result, Err(DropReason::Malformed(_))));

        let wrong_type = json!({"type": "Point", "coordinates": [0.0, 0.0]});
        assert!(matches!(convert_feature(wrong_type), Err(DropReason::Malformed(_))));
    }

    #[test]
    fn test_position_ignores_altitude() {
        assert_eq!(
            parse_position(&[1.5, 2.5, 1600.0]),
            Some(Coordinate::new(2.5, 1.5))
        );
        assert_eq!(parse_position(&[f64::NAN, 2.5]), None);
    }
}
