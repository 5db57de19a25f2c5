//! osmfind - Look up OpenStreetMap places with Nominatim and open them in JOSM

pub mod api;
pub mod config;
pub mod geocoder;
pub mod geometry;
pub mod links;
pub mod report;

pub use api::{ApiError, HttpTransport, Transport};
pub use config::Config;
pub use geocoder::{Geocoder, LookupError, ReverseRequest, UsageError};
