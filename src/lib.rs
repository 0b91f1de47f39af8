//! polysearch - find point listings inside a freehand polygon drawn over a map

pub mod config;
pub mod domain;
pub mod geometry;
pub mod query;
pub mod session;
pub mod store;

pub use domain::{Coordinate, Feature, Polygon, Price, Theme};
pub use geometry::InvalidPolygonError;
pub use query::{QueryResult, query};
pub use store::{FeatureStore, ParseError};
