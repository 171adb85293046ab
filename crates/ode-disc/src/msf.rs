//! Minute/second/frame addressing.
//!
//! CD addresses come in three flavours: MSF as written in CUE sheets and TOC
//! entries, the zero-based logical block address (LBA) used for streaming,
//! and the frame address (FAD) which counts the 2-second lead-in pregap.

use serde::Serialize;
use std::fmt;

pub const FRAMES_PER_SECOND: u32 = 75;
pub const SECONDS_PER_MINUTE: u32 = 60;
pub const FRAMES_PER_MINUTE: u32 = FRAMES_PER_SECOND * SECONDS_PER_MINUTE;

/// Frames between FAD 0 and LBA 0.
pub const PREGAP_FRAMES: u32 = 150;

/// Convert a logical block address to a frame address.
pub fn lba_to_fad(lba: u32) -> u32 {
    lba + PREGAP_FRAMES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Msf {
    pub minute: u8,
    pub second: u8,
    pub frame: u8,
}

impl Msf {
    pub fn new(minute: u8, second: u8, frame: u8) -> Self {
        Self {
            minute,
            second,
            frame,
        }
    }

    /// Build from a frame count. Minutes saturate at 255.
    pub fn from_frames(frames: u32) -> Self {
        let minute = (frames / FRAMES_PER_MINUTE).min(u8::MAX as u32) as u8;
        let second = ((frames / FRAMES_PER_SECOND) % SECONDS_PER_MINUTE) as u8;
        let frame = (frames % FRAMES_PER_SECOND) as u8;
        Self {
            minute,
            second,
            frame,
        }
    }

    pub fn to_frames(self) -> u32 {
        self.minute as u32 * FRAMES_PER_MINUTE
            + self.second as u32 * FRAMES_PER_SECOND
            + self.frame as u32
    }

    /// Parse `mm:ss:ff`. Seconds must be below 60 and frames below 75.
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.trim().split(':');
        let minute: u8 = parts.next()?.parse().ok()?;
        let second: u8 = parts.next()?.parse().ok()?;
        let frame: u8 = parts.next()?.parse().ok()?;
        if parts.next().is_some()
            || second as u32 >= SECONDS_PER_MINUTE
            || frame as u32 >= FRAMES_PER_SECOND
        {
            return None;
        }
        Some(Self::new(minute, second, frame))
    }
}

impl fmt::Display for Msf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.minute, self.second, self.frame)
    }
}
