pub mod engine;

pub use engine::{LISTING_TITLE, ListingAnnotation, Match, QueryResult, query};
