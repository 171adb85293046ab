//! Console area codes used when patching a title's boot header.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Target area for region patching.
///
/// Each area has a single-letter symbol written into the boot header's
/// area-symbol field and a label written into the area-code group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatchRegion {
    Japan,
    Taiwan,
    #[serde(alias = "usa")]
    NorthAmerica,
    Brazil,
    Korea,
    AsiaPal,
    Europe,
    LatinAmerica,
}

impl PatchRegion {
    /// All regions in area-symbol order.
    pub const ALL: [PatchRegion; 8] = [
        PatchRegion::Japan,
        PatchRegion::Taiwan,
        PatchRegion::NorthAmerica,
        PatchRegion::Brazil,
        PatchRegion::Korea,
        PatchRegion::AsiaPal,
        PatchRegion::Europe,
        PatchRegion::LatinAmerica,
    ];

    /// Single-letter area symbol.
    pub fn symbol(self) -> u8 {
        match self {
            PatchRegion::Japan => b'J',
            PatchRegion::Taiwan => b'T',
            PatchRegion::NorthAmerica => b'U',
            PatchRegion::Brazil => b'B',
            PatchRegion::Korea => b'K',
            PatchRegion::AsiaPal => b'A',
            PatchRegion::Europe => b'E',
            PatchRegion::LatinAmerica => b'L',
        }
    }

    /// Area label as stored in the boot header's area-code group.
    pub fn area_label(self) -> &'static str {
        match self {
            PatchRegion::Japan => "For JAPAN.",
            PatchRegion::Taiwan => "For TAIWAN and PHILIPINES.",
            PatchRegion::NorthAmerica => "For USA and CANADA.",
            PatchRegion::Brazil => "For BRAZIL.",
            PatchRegion::Korea => "For KOREA.",
            PatchRegion::AsiaPal => "For ASIA PAL area.",
            PatchRegion::Europe => "For EUROPE.",
            PatchRegion::LatinAmerica => "For LATIN AMERICA.",
        }
    }

    fn name(self) -> &'static str {
        match self {
            PatchRegion::Japan => "japan",
            PatchRegion::Taiwan => "taiwan",
            PatchRegion::NorthAmerica => "north_america",
            PatchRegion::Brazil => "brazil",
            PatchRegion::Korea => "korea",
            PatchRegion::AsiaPal => "asia_pal",
            PatchRegion::Europe => "europe",
            PatchRegion::LatinAmerica => "latin_america",
        }
    }
}

impl fmt::Display for PatchRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PatchRegion {
    type Err = crate::Error;

    /// Accepts the snake_case name, `usa`, or the single-letter symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "usa" {
            return Ok(PatchRegion::NorthAmerica);
        }
        PatchRegion::ALL
            .into_iter()
            .find(|r| {
                r.name() == lower
                    || (lower.len() == 1 && lower.as_bytes()[0] == r.symbol().to_ascii_lowercase())
            })
            .ok_or_else(|| crate::Error::Validation(format!("unknown patch region '{s}'")))
    }
}
