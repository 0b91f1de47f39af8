use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

use super::Coordinate;

/// Listing price as it appeared in the source properties
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Price {
    Number(f64),
    Text(String),
}

impl Price {
    /// Read a price from a raw property value.
    ///
    /// Accepts finite numbers and non-blank strings; anything else is not a
    /// usable price.
    pub fn from_value(value: &Value) -> Option<Price> {
        match value {
            Value::Number(n) => n.as_f64().filter(|v| v.is_finite()).map(Price::Number),
            Value::String(s) if !s.trim().is_empty() => Some(Price::Text(s.trim().to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Number(n) => write!(f, "{}", n),
            Price::Text(s) => f.write_str(s),
        }
    }
}

/// A point listing loaded from the feature collection
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
    pub coordinate: Coordinate,
    pub price: Price,
    /// Every property from the source record, `price` included
    pub properties: Map<String, Value>,
}

impl Feature {
    pub fn new(coordinate: Coordinate, price: Price, properties: Map<String, Value>) -> Self {
        Self {
            coordinate,
            price,
            properties,
        }
    }

    /// Label shown next to the listing marker, e.g. `$350000`
    pub fn price_label(&self) -> String {
        format!("${}", self.price)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_price_from_value() {
        assert_eq!(Price::from_value(&json!(350000)), Some(Price::Number(350000.0)));
        assert_eq!(
            Price::from_value(&json!(" 1,200/mo ")),
            Some(Price::Text("1,200/mo".to_string()))
        );
        assert_eq!(Price::from_value(&json!("  ")), None);
        assert_eq!(Price::from_value(&json!(null)), None);
        assert_eq!(Price::from_value(&json!([1, 2])), None);
    }

    #[test]
    fn test_price_label() {
        let props = Map::new();
        let whole = Feature::new(Coordinate::new(0.0, 0.0), Price::Number(350000.0), props.clone());
        assert_eq!(whole.price_label(), "$350000");

        let fractional =
            Feature::new(Coordinate::new(0.0, 0.0), Price::Number(1250.5), props.clone());
        assert_eq!(fractional.price_label(), "$1250.5");

        let text = Feature::new(Coordinate::new(0.0, 0.0), Price::Text("995".into()), props);
        assert_eq!(text.price_label(), "$995");
    }
}
