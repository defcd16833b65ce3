//! Configuration handling for chnroute
//!
//! Two layers: the optional TOML [`Config`] file describing where the feed
//! comes from, and the per-run [`GenerateConfig`] built from the command line
//! and handed to the pipeline.

use crate::Platform;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// APNIC delegation report for the Asia-Pacific region
pub const DEFAULT_FEED_URL: &str = "http://ftp.apnic.net/apnic/stats/apnic/delegated-apnic-latest";

/// External download utility tried before the built-in HTTP client
pub const DEFAULT_DOWNLOADER: &str = "wget";

pub const DEFAULT_METRIC: u32 = 5;

/// Config file looked up in the working directory
pub const LOCAL_CONFIG: &str = "chnroute.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub feed: FeedConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_downloader")]
    pub downloader: String,
}

fn default_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_downloader() -> String {
    DEFAULT_DOWNLOADER.to_string()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            downloader: default_downloader(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load an explicit config file, or fall back to the default locations
    ///
    /// Lookup order: `./chnroute.toml`, `~/.chnroute/config.toml`, built-in
    /// defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.exists() {
            debug!("Using config {}", local.display());
            return Self::load(&local);
        }

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".chnroute").join("config.toml");
            if home_config.exists() {
                debug!("Using config {}", home_config.display());
                return Self::load(&home_config);
            }
        }

        debug!("No config file found, using defaults");
        Ok(Self::default())
    }
}

/// Settings for a single generation run
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateConfig {
    pub platform: Platform,
    /// Route metric; only the legacy, Linux and Windows scripts use it
    pub metric: u32,
    pub output_dir: PathBuf,
}

impl GenerateConfig {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            metric: DEFAULT_METRIC,
            output_dir: PathBuf::from("."),
        }
    }

    pub fn with_metric(mut self, metric: u32) -> Self {
        self.metric = metric;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }
}
