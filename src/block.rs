//! Conversion of delegation records into routable address blocks

use crate::registry::RegistryRecord;
use std::fmt;
use std::net::Ipv4Addr;
use thiserror::Error;

/// Largest block an IPv4 record can describe (the whole address space)
const MAX_COUNT: u64 = 1 << 32;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum BlockError {
    #[error("Invalid address count for {start}: {count:?}")]
    InvalidCount { start: String, count: String },
    #[error("Address count for {start} is not a power of two: {count}")]
    NotPowerOfTwo { start: String, count: u64 },
}

/// A network in both netmask and prefix-length notation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressBlock {
    /// Network address exactly as it appears in the feed
    pub network: String,
    pub netmask: Ipv4Addr,
    pub prefix_len: u8,
}

impl AddressBlock {
    /// Build a block from its first address and size
    ///
    /// `count` must be a power of two between 1 and 2^32. Delegation reports
    /// only ever use such sizes for IPv4, so anything else is rejected rather
    /// than rounded.
    pub fn new(network: &str, count: u64) -> Result<Self, BlockError> {
        if !count.is_power_of_two() || count > MAX_COUNT {
            return Err(BlockError::NotPowerOfTwo {
                start: network.to_string(),
                count,
            });
        }

        let host_bits = count.trailing_zeros();
        let mask = (0xFFFF_FFFF_u64 ^ (count - 1)) as u32;

        Ok(Self {
            network: network.to_string(),
            netmask: Ipv4Addr::from(mask),
            prefix_len: (32 - host_bits) as u8,
        })
    }

    pub fn from_record(record: &RegistryRecord<'_>) -> Result<Self, BlockError> {
        let count = record
            .count
            .parse::<u64>()
            .map_err(|_| BlockError::InvalidCount {
                start: record.start.to_string(),
                count: record.count.to_string(),
            })?;
        Self::new(record.start, count)
    }
}

impl fmt::Display for AddressBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.network, self.prefix_len)
    }
}

/// Convert every record in order, stopping at the first bad one
pub fn convert_all(records: &[RegistryRecord<'_>]) -> Result<Vec<AddressBlock>, BlockError> {
    records.iter().map(AddressBlock::from_record).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::parse_records;

    #[test]
    fn test_class_c_block() {
        let block = AddressBlock::new("1.2.3.0", 256).unwrap();
        assert_eq!(block.network, "1.2.3.0");
        assert_eq!(block.netmask.to_string(), "255.255.255.0");
        assert_eq!(block.prefix_len, 24);
        assert_eq!(block.to_string(), "1.2.3.0/24");
    }

    #[test]
    fn test_prefix_for_every_power_of_two() {
        for k in 0..=32u32 {
            let count = 1u64 << k;
            let block = AddressBlock::new("10.0.0.0", count).unwrap();
            assert_eq!(u32::from(block.prefix_len), 32 - k, "count {}", count);
        }
    }

    #[test]
    fn test_netmask_matches_prefix() {
        for p in 0..=32u32 {
            let count = 1u64 << (32 - p);
            let block = AddressBlock::new("10.0.0.0", count).unwrap();
            let rendered: Ipv4Addr = block.netmask.to_string().parse().unwrap();
            let expected = (0xFFFF_FFFF_u64 << (32 - p)) as u32;
            assert_eq!(u32::from(rendered), expected, "prefix {}", p);
            assert_eq!(u32::from(block.prefix_len), p);
        }
    }

    #[test]
    fn test_edge_masks() {
        let block = AddressBlock::new("0.0.0.0", 1 << 32).unwrap();
        assert_eq!(block.netmask.to_string(), "0.0.0.0");
        assert_eq!(block.prefix_len, 0);

        let block = AddressBlock::new("1.2.3.4", 1).unwrap();
        assert_eq!(block.netmask.to_string(), "255.255.255.255");
        assert_eq!(block.prefix_len, 32);

        let block = AddressBlock::new("1.0.0.0", 1 << 20).unwrap();
        assert_eq!(block.netmask.to_string(), "255.240.0.0");
        assert_eq!(block.prefix_len, 12);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        for count in [0u64, 3, 768, 1536, 65535] {
            let result = AddressBlock::new("1.2.3.0", count);
            assert_eq!(
                result,
                Err(BlockError::NotPowerOfTwo {
                    start: "1.2.3.0".to_string(),
                    count
                })
            );
        }

        let result = AddressBlock::new("0.0.0.0", 1 << 33);
        assert!(matches!(result, Err(BlockError::NotPowerOfTwo { .. })));
    }

    #[test]
    fn test_from_record() {
        let records = parse_records("apnic|cn|ipv4|1.2.3.0|256|20100101|allocated\n");
        let block = AddressBlock::from_record(&records[0]).unwrap();
        assert_eq!(
            block,
            AddressBlock {
                network: "1.2.3.0".to_string(),
                netmask: Ipv4Addr::new(255, 255, 255, 0),
                prefix_len: 24,
            }
        );
    }

    #[test]
    fn test_from_record_invalid_count() {
        let records = parse_records("apnic|cn|ipv4|1.2.3.0|99999999999999999999999|20100101|allocated\n");
        let result = AddressBlock::from_record(&records[0]);
        assert!(matches!(result, Err(BlockError::InvalidCount { .. })));
    }

    #[test]
    fn test_convert_all_stops_at_first_error() {
        let text = "\
apnic|CN|ipv4|1.0.1.0|256|20110414|allocated
apnic|CN|ipv4|1.0.2.0|768|20110414|allocated
apnic|CN|ipv4|1.0.8.0|2048|20110414|allocated
";
        let records = parse_records(text);
        let result = convert_all(&records);
        assert_eq!(
            result,
            Err(BlockError::NotPowerOfTwo {
                start: "1.0.2.0".to_string(),
                count: 768
            })
        );

        let blocks = convert_all(&records[..1]).unwrap();
        assert_eq!(blocks.len(), 1);
        assert!(convert_all(&[]).unwrap().is_empty());
    }
}
