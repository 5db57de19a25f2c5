use regex::Regex;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;

fn number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
    })
}

/// WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lat, self.lon)
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("no number found in {0:?}")]
pub struct CoordinateError(pub String);

/// Extract the first signed decimal or scientific number from `text`.
///
/// Surrounding text is ignored, so `"42.195 blah"` and `"lat=42.195"` both
/// give `42.195`.
pub fn parse_coordinate(text: &str) -> Result<f64, CoordinateError> {
    number_re()
        .find(text)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(|| CoordinateError(text.to_string()))
}

/// Format degrees for URLs, keeping a `.0` on whole values (`52.0`, not `52`).
pub fn format_degrees(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}
