//! APNIC delegation record parsing
//!
//! A delegation report is pipe-delimited text, one record per line:
//!
//! ```text
//! apnic|CN|ipv4|1.0.1.0|256|20110414|allocated
//! ```
//!
//! Only IPv4 records for the target country whose status starts with `a`
//! (`allocated`, `assigned`) are kept. Everything else is skipped silently.

use regex::Regex;
use std::sync::OnceLock;

pub const REGISTRY: &str = "apnic";
pub const COUNTRY: &str = "cn";
pub const PROTOCOL: &str = "ipv4";

static RECORD_REGEX: OnceLock<Regex> = OnceLock::new();

fn record_regex() -> &'static Regex {
    RECORD_REGEX.get_or_init(|| {
        let pattern = format!(r"(?im)^{REGISTRY}\|{COUNTRY}\|{PROTOCOL}\|[\d.]+\|\d+\|\d+\|a\w*");
        Regex::new(&pattern).expect("Invalid Regex")
    })
}

/// One matching delegation line, borrowed from the feed text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegistryRecord<'a> {
    pub registry: &'a str,
    pub country: &'a str,
    pub protocol: &'a str,
    /// First address of the block, dotted quad
    pub start: &'a str,
    /// Number of addresses, still unparsed
    pub count: &'a str,
    pub date: &'a str,
    pub status: &'a str,
}

impl<'a> RegistryRecord<'a> {
    fn from_match(line: &'a str) -> Option<Self> {
        let mut fields = line.split('|');
        Some(Self {
            registry: fields.next()?,
            country: fields.next()?,
            protocol: fields.next()?,
            start: fields.next()?,
            count: fields.next()?,
            date: fields.next()?,
            status: fields.next()?,
        })
    }
}

/// Extract the matching records from a delegation report, in feed order
pub fn parse_records(text: &str) -> Vec<RegistryRecord<'_>> {
    record_regex()
        .find_iter(text)
        .filter_map(|m| RegistryRecord::from_match(m.as_str()))
        .collect()
}
