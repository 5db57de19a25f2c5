use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::{ApiError, Transport, endpoint};
use crate::geometry::{Point, format_degrees};

/// A single `jsonv2` result from Nominatim `search` or `reverse`.
#[derive(Debug, Clone, Deserialize)]
pub struct Place {
    #[serde(deserialize_with = "coordinate")]
    pub lat: f64,
    #[serde(deserialize_with = "coordinate")]
    pub lon: f64,
    pub category: String,
    #[serde(rename = "type")]
    pub type_: String,
    pub display_name: String,
    #[serde(default)]
    pub place_id: Option<u64>,
    #[serde(default)]
    pub osm_type: Option<String>,
    #[serde(default)]
    pub osm_id: Option<u64>,
    #[serde(default)]
    pub importance: Option<f64>,
}

impl Place {
    pub fn point(&self) -> Point {
        Point::new(self.lat, self.lon)
    }
}

/// Nominatim sends coordinates as strings; accept plain numbers too.
fn coordinate<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid coordinate {s:?}: {e}"))),
    }
}

pub struct NominatimClient<'a, T> {
    transport: &'a T,
    base_url: &'a str,
}

impl<'a, T: Transport> NominatimClient<'a, T> {
    pub fn new(transport: &'a T, base_url: &'a str) -> Self {
        Self {
            transport,
            base_url,
        }
    }

    /// Forward geocode free text. An empty list is a valid answer.
    pub fn search(&self, query: &str) -> Result<Vec<Place>, ApiError> {
        let url = endpoint(self.base_url, "search");
        let response = self
            .transport
            .get(
                &url,
                &[("format", "jsonv2".to_string()), ("q", query.to_string())],
            )?
            .ensure_success(&url)?;

        serde_json::from_str(&response.body).map_err(|source| ApiError::Json { url, source })
    }

    /// Reverse geocode a point to the place containing it.
    ///
    /// Nominatim reports "nothing here" as a 200 with an `error` field,
    /// which becomes `ApiError::Provider`.
    pub fn reverse(&self, point: Point) -> Result<Place, ApiError> {
        let url = endpoint(self.base_url, "reverse");
        let response = self
            .transport
            .get(
                &url,
                &[
                    ("format", "jsonv2".to_string()),
                    ("lat", format_degrees(point.lat)),
                    ("lon", format_degrees(point.lon)),
                ],
            )?
            .ensure_success(&url)?;

        let value: Value = serde_json::from_str(&response.body).map_err(|source| ApiError::Json {
            url: url.clone(),
            source,
        })?;

        if let Some(error) = value.get("error") {
            let message = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(ApiError::Provider(message));
        }

        serde_json::from_value(value).map_err(|source| ApiError::Json { url, source })
    }
}
