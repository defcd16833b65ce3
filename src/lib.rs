//! chnroute - split-tunnel route scripts for China IPv4 networks
//!
//! This crate downloads the APNIC delegation report, extracts the IPv4
//! blocks delegated to China and writes route scripts that send traffic for
//! those networks through the original gateway instead of the VPN tunnel.
//!
//! # Architecture
//!
//! - `feed`: Feed download (external downloader with HTTP fallback)
//! - `registry`: Delegation record parsing
//! - `block`: Record to network/netmask/prefix conversion
//! - `emit`: Per-platform script rendering and file output
//! - `generate`: The end-to-end pipeline
//! - `config`: Configuration file handling (TOML)
//!
//! # Usage
//!
//! ```bash
//! chnroute -p linux -m 5
//! ```

pub mod block;
pub mod config;
pub mod emit;
pub mod feed;
pub mod generate;
pub mod registry;

pub use block::AddressBlock;
pub use config::{Config, GenerateConfig};
pub use emit::Platform;
pub use feed::Fetcher;
pub use generate::{Error, generate, generate_for, init_config, load_config};
