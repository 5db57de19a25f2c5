use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::geometry::bbox::DEFAULT_DELTA;

fn default_nominatim_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}
fn default_user_agent() -> String {
    format!(
        "osmfind/{} (+https://github.com/osmfind/osmfind)",
        env!("CARGO_PKG_VERSION")
    )
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_josm_url() -> String {
    "http://localhost:8111".to_string()
}
fn default_view_url() -> String {
    "https://www.openstreetmap.org".to_string()
}
fn default_zoom() -> u8 {
    17
}
fn default_bbox_delta() -> f64 {
    DEFAULT_DELTA
}

/// Settings resolved once at startup and shared read-only afterwards.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub nominatim: NominatimConfig,
    #[serde(default)]
    pub josm: JosmConfig,
    #[serde(default)]
    pub view: ViewConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct NominatimConfig {
    #[serde(default = "default_nominatim_url")]
    pub url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            url: default_nominatim_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// JOSM remote control listener.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct JosmConfig {
    #[serde(default = "default_josm_url")]
    pub url: String,
}

impl Default for JosmConfig {
    fn default() -> Self {
        Self {
            url: default_josm_url(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ViewConfig {
    #[serde(default = "default_view_url")]
    pub url: String,
    #[serde(default = "default_zoom")]
    pub zoom: u8,
    #[serde(default = "default_bbox_delta")]
    pub bbox_delta: f64,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            url: default_view_url(),
            zoom: default_zoom(),
            bbox_delta: default_bbox_delta(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or fall back to the first config file
    /// found on the search path, or the built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {:?}", path);
                }
                Self::from_file(path)
            }
            None => Ok(Self::search(&get_config_paths()).unwrap_or_default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    fn search(paths: &[PathBuf]) -> Option<Self> {
        for path in paths {
            if !path.exists() {
                continue;
            }
            match Self::from_file(path) {
                Ok(config) => {
                    log::debug!("Using config file {:?}", path);
                    return Some(config);
                }
                Err(e) => log::warn!("Skipping config file {:?}: {:#}", path, e),
            }
        }
        None
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("osmfind.toml"));
    paths.push(PathBuf::from(".osmfind.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("osmfind").join("config.toml"));
        paths.push(config_dir.join("osmfind.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".osmfind.toml"));
    }

    paths
}
