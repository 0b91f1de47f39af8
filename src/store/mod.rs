pub mod collection;
pub mod geojson;

pub use collection::{DroppedFeature, FeatureStore, LoadReport, ParseError};
pub use geojson::DropReason;
