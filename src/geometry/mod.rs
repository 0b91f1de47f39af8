pub mod bounds;
pub mod containment;
pub mod ring;
pub mod validation;

pub use bounds::BoundingBox;
pub use containment::{on_boundary, point_in_polygon};
pub use ring::{close_ring, connector};
pub use validation::{InvalidPolygonError, is_degenerate, validate};
