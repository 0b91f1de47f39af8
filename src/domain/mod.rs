pub mod coordinate;
pub mod feature;
pub mod polygon;
pub mod theme;

pub use coordinate::Coordinate;
pub use feature::{Feature, Price};
pub use polygon::Polygon;
pub use theme::Theme;
