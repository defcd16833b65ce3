//! The fetch → parse → convert → emit pipeline

use crate::block::{self, AddressBlock, BlockError};
use crate::config::{self, Config, GenerateConfig};
use crate::emit::{EmitError, Platform, UnknownPlatform};
use crate::feed::{FetchError, Fetcher};
use crate::registry;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Feed fetch failed: {0}")]
    FetchError(#[from] FetchError),
    #[error("Invalid delegation record: {0}")]
    BlockError(#[from] BlockError),
    #[error("Script output failed: {0}")]
    EmitError(#[from] EmitError),
    #[error("Config error: {0}")]
    ConfigError(#[from] config::ConfigError),
    #[error(transparent)]
    UnknownPlatform(#[from] UnknownPlatform),
}

/// Resolve the config file for a run, see [`Config::discover`]
pub fn load_config(explicit: Option<&Path>) -> Result<Config, Error> {
    Ok(Config::discover(explicit)?)
}

/// Write the default config as `chnroute.toml` in `dir`
pub fn init_config(dir: &Path) -> Result<PathBuf, Error> {
    let path = dir.join(config::LOCAL_CONFIG);
    Config::default().save(&path)?;
    Ok(path)
}

/// Download the feed and turn it into address blocks
pub fn fetch_blocks(fetcher: &Fetcher, url: &str) -> Result<Vec<AddressBlock>, Error> {
    let text = fetcher.fetch(url)?;
    let records = registry::parse_records(&text);
    debug!("Matched {} delegation records", records.len());
    Ok(block::convert_all(&records)?)
}

/// Generate the scripts for `config.platform` into `config.output_dir`
///
/// Every record is converted before any file is created, so a bad record
/// leaves existing scripts untouched.
pub fn generate(config: &GenerateConfig, fetcher: &Fetcher, url: &str) -> Result<Vec<PathBuf>, Error> {
    let blocks = fetch_blocks(fetcher, url)?;

    let emitter = config.platform.emitter();
    let scripts = emitter.render(&blocks, config.metric);
    let written = scripts.write_to(&config.output_dir)?;

    debug!(
        "Generated {} routes for {} in {}",
        blocks.len(),
        config.platform,
        config.output_dir.display()
    );
    Ok(written)
}

/// Like [`generate`], with the platform given by name
///
/// An unknown name fails before anything is fetched or written.
pub fn generate_for(
    platform: &str,
    metric: u32,
    output_dir: impl Into<PathBuf>,
    fetcher: &Fetcher,
    url: &str,
) -> Result<Vec<PathBuf>, Error> {
    let platform: Platform = platform.parse()?;
    let config = GenerateConfig::new(platform)
        .with_metric(metric)
        .with_output_dir(output_dir);
    generate(&config, fetcher, url)
}
