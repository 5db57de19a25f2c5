pub mod bbox;
pub mod point;

pub use bbox::BoundingBox;
pub use point::{Point, format_degrees, parse_coordinate};
