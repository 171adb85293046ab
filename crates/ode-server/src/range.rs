//! `Range` header parsing and byte-to-sector conversion.

use ode_disc::SECTOR_SIZE;

/// Parse a `Range: bytes=START-END` header value.
///
/// Returns `(start, Option<end>)` where `end` is `None` for open-ended ranges
/// like `bytes=500-`. Suffix ranges (`bytes=-500`) have no start and are
/// rejected.
pub fn parse_range_header(value: &str) -> Option<(u64, Option<u64>)> {
    let bytes_prefix = value.trim().strip_prefix("bytes=")?;
    let mut parts = bytes_prefix.splitn(2, '-');
    let start_str = parts.next()?.trim();
    let end_str = parts.next()?.trim();

    let start: u64 = start_str.parse().ok()?;
    let end: Option<u64> = if end_str.is_empty() {
        None
    } else {
        Some(end_str.parse().ok()?)
    };

    Some((start, end))
}

/// Sector holding byte `offset`. Offsets inside a sector round down to its
/// boundary; `None` if the address does not fit a sector cursor.
pub fn start_sector(offset: u64) -> Option<u32> {
    u32::try_from(offset / SECTOR_SIZE as u64).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_range_full() {
        let (start, end) = parse_range_header("bytes=0-999").unwrap();
        assert_eq!(start, 0);
        assert_eq!(end, Some(999));
    }

    #[test]
    fn parse_range_open_end() {
        let (start, end) = parse_range_header("bytes=500-").unwrap();
        assert_eq!(start, 500);
        assert_eq!(end, None);
    }

    #[test]
    fn parse_range_invalid() {
        assert!(parse_range_header("invalid").is_none());
        assert!(parse_range_header("bytes=abc-def").is_none());
        assert!(parse_range_header("bytes=-500").is_none());
        assert!(parse_range_header("bytes=100").is_none());
        assert!(parse_range_header("items=0-10").is_none());
    }

    #[test]
    fn start_sector_rounds_down() {
        assert_eq!(start_sector(0), Some(0));
        assert_eq!(start_sector(2047), Some(0));
        assert_eq!(start_sector(2048), Some(1));
        assert_eq!(start_sector(5000), Some(2));
    }

    #[test]
    fn start_sector_overflow() {
        assert_eq!(start_sector(u64::MAX), None);
    }
}
