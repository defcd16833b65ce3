//! Delegation feed retrieval
//!
//! The feed is fetched by the first available [`FeedSource`]. The default
//! order shells out to an external download utility and, when that utility
//! cannot be started at all, falls back to the built-in HTTP client.

pub mod http;
pub mod wget;

pub use http::HttpSource;
pub use wget::WgetSource;

use crate::config::FeedConfig;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("{source_name} is unavailable: {reason}")]
    Unavailable { source_name: String, reason: String },
    #[error("{program} exited with {status}")]
    CommandFailed { program: String, status: std::process::ExitStatus },
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Feed is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
    #[error("No feed source available")]
    NoSourceAvailable,
}

/// A strategy for downloading the feed
pub trait FeedSource {
    fn name(&self) -> &str;

    /// Download `url` and return the body as text
    ///
    /// Returns [`FetchError::Unavailable`] when this source cannot be used on
    /// the host, which lets the [`Fetcher`] move on to the next one.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct Fetcher {
    sources: Vec<Box<dyn FeedSource>>,
}

impl Fetcher {
    /// External downloader first, then the HTTP client
    pub fn new(config: &FeedConfig) -> Self {
        Self::with_sources(vec![
            Box::new(WgetSource::new(config.downloader.clone())),
            Box::new(HttpSource::new()),
        ])
    }

    pub fn with_sources(sources: Vec<Box<dyn FeedSource>>) -> Self {
        Self { sources }
    }

    pub fn fetch(&self, url: &str) -> Result<String, FetchError> {
        for source in &self.sources {
            debug!("Fetching {} via {}", url, source.name());
            match source.fetch(url) {
                Err(FetchError::Unavailable { source_name, reason }) => {
                    debug!("{} unavailable: {}", source_name, reason);
                    continue;
                }
                result => return result,
            }
        }
        Err(FetchError::NoSourceAvailable)
    }
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(&FeedConfig::default())
    }
}
