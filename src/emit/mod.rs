//! Route script generation
//!
//! Each target platform has an [`Emitter`] that renders the address blocks
//! into a [`ScriptSet`]: the up script run when the VPN comes up and the down
//! script run when it goes away. Rendering is pure; [`ScriptSet::write_to`]
//! is the only part that touches the filesystem.

pub mod linux;
pub mod mac;
pub mod old;
pub mod openvpn;
pub mod windows;

use crate::block::AddressBlock;
use std::fmt;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum EmitError {
    #[error("Failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl EmitError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown platform: {0}")]
pub struct UnknownPlatform(pub String);

/// Target of the generated scripts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Platform {
    /// OpenVPN up/down hooks using `ip -batch`
    #[default]
    OpenVpn,
    /// Legacy OpenVPN `route` directives for the client config
    Old,
    /// PPP `ip-pre-up` / `ip-down` hooks
    Linux,
    /// macOS PPP `ip-up` / `ip-down` hooks
    Mac,
    /// Windows batch files
    Windows,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::OpenVpn,
        Platform::Old,
        Platform::Mac,
        Platform::Linux,
        Platform::Windows,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::OpenVpn => "openvpn",
            Platform::Old => "old",
            Platform::Linux => "linux",
            Platform::Mac => "mac",
            Platform::Windows => "win",
        }
    }

    /// Get the emitter for this platform
    pub fn emitter(self) -> Box<dyn Emitter> {
        match self {
            Platform::OpenVpn => Box::new(openvpn::OpenVpnEmitter),
            Platform::Old => Box::new(old::OldEmitter),
            Platform::Linux => Box::new(linux::LinuxEmitter),
            Platform::Mac => Box::new(mac::MacEmitter),
            Platform::Windows => Box::new(windows::WindowsEmitter),
        }
    }
}

impl FromStr for Platform {
    type Err = UnknownPlatform;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "openvpn" => Ok(Platform::OpenVpn),
            "old" => Ok(Platform::Old),
            "linux" => Ok(Platform::Linux),
            "mac" => Ok(Platform::Mac),
            "win" => Ok(Platform::Windows),
            _ => Err(UnknownPlatform(s.to_string())),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Renders address blocks into platform-specific scripts
pub trait Emitter {
    fn platform(&self) -> Platform;

    /// `metric` is ignored by targets whose route syntax has no metric
    fn render(&self, blocks: &[AddressBlock], metric: u32) -> ScriptSet;
}

/// One generated output file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Script {
    pub name: &'static str,
    pub body: String,
    /// Mark the file `0755` after writing (Unix only)
    pub executable: bool,
}

impl Script {
    pub(crate) fn new(name: &'static str, executable: bool, header: &str) -> Self {
        Self {
            name,
            body: header.to_string(),
            executable,
        }
    }

    pub(crate) fn push_line(&mut self, line: &str) {
        self.body.push_str(line);
        self.body.push('\n');
    }

    pub(crate) fn push_str(&mut self, text: &str) {
        self.body.push_str(text);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSet {
    pub scripts: Vec<Script>,
}

impl ScriptSet {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self { scripts }
    }

    pub fn get(&self, name: &str) -> Option<&Script> {
        self.scripts.iter().find(|s| s.name == name)
    }

    /// Write every script into `dir`, replacing existing files
    ///
    /// All files are created before any content is written. Each file is
    /// flushed and closed before its permissions are changed.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>, EmitError> {
        let mut opened = Vec::with_capacity(self.scripts.len());
        for script in &self.scripts {
            let path = dir.join(script.name);
            let file = File::create(&path).map_err(|e| EmitError::io(&path, e))?;
            opened.push((script, path, file));
        }

        let mut written = Vec::with_capacity(opened.len());
        for (script, path, file) in opened {
            let mut writer = BufWriter::new(file);
            writer
                .write_all(script.body.as_bytes())
                .map_err(|e| EmitError::io(&path, e))?;
            let file = writer
                .into_inner()
                .map_err(|e| EmitError::io(&path, e.into_error()))?;
            drop(file);

            if script.executable {
                set_executable(&path).map_err(|e| EmitError::io(&path, e))?;
            }
            debug!("Wrote {} ({} bytes)", path.display(), script.body.len());
            written.push(path);
        }

        Ok(written)
    }
}

#[cfg(unix)]
fn set_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Sequential /24 blocks for emitter tests
#[cfg(test)]
pub(crate) fn test_blocks(n: usize) -> Vec<AddressBlock> {
    (0..n)
        .map(|i| AddressBlock::new(&format!("10.{}.{}.0", i / 256, i % 256), 256).unwrap())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_platform_parse() {
        assert_eq!("openvpn".parse::<Platform>().unwrap(), Platform::OpenVpn);
        assert_eq!("old".parse::<Platform>().unwrap(), Platform::Old);
        assert_eq!("linux".parse::<Platform>().unwrap(), Platform::Linux);
        assert_eq!("mac".parse::<Platform>().unwrap(), Platform::Mac);
        assert_eq!("win".parse::<Platform>().unwrap(), Platform::Windows);
        assert_eq!("OpenVPN".parse::<Platform>().unwrap(), Platform::OpenVpn);
        assert_eq!(
            "android".parse::<Platform>(),
            Err(UnknownPlatform("android".to_string()))
        );
    }

    #[test]
    fn test_platform_round_trips_through_name() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
            assert_eq!(platform.emitter().platform(), platform);
        }
        assert_eq!(Platform::default(), Platform::OpenVpn);
    }

    #[test]
    fn test_unknown_platform_display() {
        let err = UnknownPlatform("bsd".to_string());
        assert_eq!(err.to_string(), "Unknown platform: bsd");
    }

    #[test]
    fn test_write_to_creates_files() {
        let dir = TempDir::new().unwrap();
        let mut up = Script::new("up.sh", true, "#!/bin/sh\n");
        up.push_line("route add 1.2.3.0/24");
        let down = Script::new("down.txt", false, "");
        let set = ScriptSet::new(vec![up, down]);

        let written = set.write_to(dir.path()).unwrap();
        assert_eq!(written, vec![dir.path().join("up.sh"), dir.path().join("down.txt")]);

        let content = std::fs::read_to_string(dir.path().join("up.sh")).unwrap();
        assert_eq!(content, "#!/bin/sh\nroute add 1.2.3.0/24\n");
        assert_eq!(std::fs::read(dir.path().join("down.txt")).unwrap(), b"");
    }

    #[cfg(unix)]
    #[test]
    fn test_write_to_sets_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let set = ScriptSet::new(vec![
            Script::new("exec.sh", true, "#!/bin/sh\n"),
            Script::new("plain.txt", false, "text\n"),
        ]);
        set.write_to(dir.path()).unwrap();

        let mode = |name: &str| {
            std::fs::metadata(dir.path().join(name))
                .unwrap()
                .permissions()
                .mode()
                & 0o777
        };
        assert_eq!(mode("exec.sh"), 0o755);
        assert_ne!(mode("plain.txt") & 0o111, 0o111);
    }

    #[test]
    fn test_write_to_overwrites_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("routes.txt");
        std::fs::write(&path, "a much longer previous file\nwith extra lines\n").unwrap();

        let set = ScriptSet::new(vec![Script::new("routes.txt", false, "new\n")]);
        set.write_to(dir.path()).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn test_write_to_missing_directory() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let set = ScriptSet::new(vec![Script::new("routes.txt", false, "")]);

        let result = set.write_to(&missing);
        assert!(matches!(result, Err(EmitError::Io { .. })));
        assert!(result.unwrap_err().to_string().contains("routes.txt"));
    }

    #[test]
    fn test_every_emitter_is_idempotent() {
        let blocks = test_blocks(10);
        for platform in Platform::ALL {
            let emitter = platform.emitter();
            let first = TempDir::new().unwrap();
            let second = TempDir::new().unwrap();

            emitter.render(&blocks, 5).write_to(first.path()).unwrap();
            emitter.render(&blocks, 5).write_to(second.path()).unwrap();
            // and once more over the first run's output
            let paths = emitter.render(&blocks, 5).write_to(first.path()).unwrap();

            for path in paths {
                let name = path.file_name().unwrap();
                assert_eq!(
                    std::fs::read(&path).unwrap(),
                    std::fs::read(second.path().join(name)).unwrap(),
                    "{} differs for {}",
                    name.to_string_lossy(),
                    platform
                );
            }
        }
    }
}
