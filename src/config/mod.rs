use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::Theme;
use crate::session::SessionSettings;

/// Display timing defaults, in milliseconds
pub mod delays {
    /// Completed drawing stays on screen this long before drawing mode ends
    pub const DISMISS_DELAY_MS: u64 = 1000;
    /// Pause between confirming a route and drawing it
    pub const ROUTE_DELAY_MS: u64 = 2000;
}

fn default_dismiss_delay_ms() -> u64 {
    delays::DISMISS_DELAY_MS
}
fn default_route_delay_ms() -> u64 {
    delays::ROUTE_DELAY_MS
}
fn default_verbose() -> bool {
    false
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0:?}")]
    NotFound(PathBuf),
    #[error("failed to read config file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FileConfig {
    /// GeoJSON FeatureCollection with the listings
    #[serde(default)]
    pub listings: Option<PathBuf>,
    #[serde(default = "default_dismiss_delay_ms")]
    pub dismiss_delay_ms: u64,
    #[serde(default = "default_route_delay_ms")]
    pub route_delay_ms: u64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub json: bool,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            listings: None,
            dismiss_delay_ms: default_dismiss_delay_ms(),
            route_delay_ms: default_route_delay_ms(),
            theme: Theme::default(),
            verbose: default_verbose(),
            json: false,
        }
    }
}

impl FileConfig {
    /// Search the usual locations and return the first config that parses
    pub fn load() -> Option<Self> {
        for path in get_config_paths() {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(&path)
            {
                match Self::parse(&contents) {
                    Ok(config) => {
                        log::debug!("Using config file {:?}", path);
                        return Some(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to parse config file {:?}: {}", path, e);
                    }
                }
            }
        }
        None
    }

    /// Load an explicitly requested config file
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            dismiss_delay: Duration::from_millis(self.dismiss_delay_ms),
            route_delay: Duration::from_millis(self.route_delay_ms),
        }
    }
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("polysearch.toml"));
    paths.push(PathBuf::from(".polysearch.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("polysearch").join("config.toml"));
        paths.push(config_dir.join("polysearch.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".polysearch.toml"));
        paths.push(home.join(".config").join("polysearch").join("config.toml"));
    }

    paths
}
