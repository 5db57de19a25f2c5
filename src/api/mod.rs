pub mod josm;
pub mod nominatim;

pub use josm::open_in_josm;
pub use nominatim::{NominatimClient, Place};

use std::time::Duration;
use thiserror::Error;

use crate::config::NominatimConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GET {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("GET {url} error: {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Nominatim answered 2xx with an `error` field.
    #[error("{0}")]
    Provider(String),

    #[error("JOSM error: unexpected response {0:?}")]
    Editor(String),
}

/// Status and body text of a completed GET.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `ApiError::Status`.
    pub fn ensure_success(self, url: &str) -> Result<Self, ApiError> {
        log::debug!("GET {} -> {}", url, self.status);
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Status {
                url: url.to_string(),
                status: self.status,
            })
        }
    }
}

/// Blocking GET with query parameters.
pub trait Transport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, ApiError>;
}

/// `Transport` backed by a shared `reqwest` blocking client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new(config: &NominatimConfig) -> anyhow::Result<Self> {
        use anyhow::Context;

        let client = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse, ApiError> {
        log::debug!("GET {} {:?}", url, query);

        let transport_error = |e: reqwest::Error| ApiError::Transport {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport_error)?;

        Ok(HttpResponse { status, body })
    }
}

/// Join a base URL and a path without doubling slashes.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
