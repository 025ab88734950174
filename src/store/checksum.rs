//! CRC32 checksums for persisted snapshot blobs
//!
//! Format: `crc32:XXXXXXXX` (lowercase hex, zero-padded). Uses the IEEE
//! polynomial via crc32fast.

use crc32fast::Hasher;

/// Computes a CRC32 checksum over the provided data.
pub fn compute_checksum(data: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(data);
    hasher.finalize()
}

/// Formats a checksum for a manifest.
pub fn format_checksum(checksum: u32) -> String {
    format!("crc32:{:08x}", checksum)
}

/// Parses a formatted checksum back to u32.
///
/// Returns `None` if the prefix is missing or the hex part is not exactly
/// eight digits.
pub fn parse_checksum(formatted: &str) -> Option<u32> {
    let hex = formatted.strip_prefix("crc32:")?;
    if hex.len() != 8 {
        return None;
    }
    u32::from_str_radix(hex, 16).ok()
}
