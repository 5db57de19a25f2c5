use super::Point;

/// Half-width in degrees of the box framed around a point.
pub const DEFAULT_DELTA: f64 = 0.005;

/// Rectangular extent in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub west: f64,
    pub east: f64,
}

impl BoundingBox {
    /// Square box of `delta` degrees on each side of `center`.
    ///
    /// No cos(lat) correction is applied: the box only frames the editor
    /// view, it does not need to be square on the ground.
    pub fn around(center: Point, delta: f64) -> Self {
        Self {
            north: center.lat + delta,
            south: center.lat - delta,
            west: center.lon - delta,
            east: center.lon + delta,
        }
    }
}
