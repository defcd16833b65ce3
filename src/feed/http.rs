//! Feed download through the built-in HTTP client

use super::{FeedSource, FetchError};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::{debug, info};

pub const FALLBACK_NOTICE: &str =
    "Fetching data from apnic.net, it might take a few minutes, please wait...";

/// Blocking GET of the feed
///
/// The client is only built when a fetch actually happens, so runs served by
/// the external downloader never start reqwest's runtime thread. No deadline
/// is applied unless one is configured.
pub struct HttpSource {
    timeout: Option<Duration>,
}

impl HttpSource {
    pub fn new() -> Self {
        Self { timeout: None }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

impl Default for HttpSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FeedSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        info!("{}", FALLBACK_NOTICE);

        let response = self.client()?.get(url).send()?.error_for_status()?;
        let body = response.bytes()?;
        debug!("HTTP fetch returned {} bytes", body.len());

        Ok(String::from_utf8(body.to_vec())?)
    }
}
