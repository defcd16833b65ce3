//! Feed download through an external utility

use super::{FeedSource, FetchError};
use std::process::{Command, Stdio};
use tracing::debug;

/// Runs `<program> <url> -O-` and captures its standard output
pub struct WgetSource {
    program: String,
}

impl WgetSource {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for WgetSource {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_DOWNLOADER)
    }
}

impl FeedSource for WgetSource {
    fn name(&self) -> &str {
        &self.program
    }

    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        // Progress output goes straight to the terminal
        let output = Command::new(&self.program)
            .args([url, "-O-"])
            .stdin(Stdio::null())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| FetchError::Unavailable {
                source_name: self.program.clone(),
                reason: e.to_string(),
            })?;

        if !output.status.success() {
            return Err(FetchError::CommandFailed {
                program: self.program.clone(),
                status: output.status,
            });
        }

        debug!("{} returned {} bytes", self.program, output.stdout.len());
        Ok(String::from_utf8(output.stdout)?)
    }
}
