//! Track layout of an opened disc image.

use serde::Serialize;

use crate::msf::lba_to_fad;

/// Sector layout of a track as stored in the image file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TrackMode {
    /// Red Book audio, 2352 bytes per frame.
    Audio,
    /// Cooked Mode 1 user data only (ISO images).
    Mode1Cooked,
    /// Raw Mode 1: sync + header + 2048 data + EDC/ECC.
    Mode1Raw,
    /// Raw Mode 2 Form 1: sync + header + subheader + 2048 data + EDC/ECC.
    Mode2Raw,
}

impl TrackMode {
    /// Parse the mode keyword of a CUE `TRACK` line.
    pub fn from_cue(keyword: &str) -> Option<Self> {
        match keyword.to_ascii_uppercase().as_str() {
            "AUDIO" => Some(TrackMode::Audio),
            "MODE1/2048" => Some(TrackMode::Mode1Cooked),
            "MODE1/2352" => Some(TrackMode::Mode1Raw),
            "MODE2/2352" => Some(TrackMode::Mode2Raw),
            _ => None,
        }
    }

    /// Bytes per sector in the image file.
    pub fn stored_sector_size(self) -> u64 {
        match self {
            TrackMode::Mode1Cooked => 2048,
            TrackMode::Audio | TrackMode::Mode1Raw | TrackMode::Mode2Raw => 2352,
        }
    }

    /// Offset of the 2048-byte user data within a stored sector.
    pub fn user_data_offset(self) -> u64 {
        match self {
            TrackMode::Audio | TrackMode::Mode1Cooked => 0,
            TrackMode::Mode1Raw => 16,
            TrackMode::Mode2Raw => 24,
        }
    }

    pub fn is_data(self) -> bool {
        !matches!(self, TrackMode::Audio)
    }

    /// Mode byte used in TOC entries.
    pub fn mode_code(self) -> u8 {
        match self {
            TrackMode::Audio => 0,
            TrackMode::Mode1Cooked | TrackMode::Mode1Raw => 1,
            TrackMode::Mode2Raw => 2,
        }
    }

    /// Q-subchannel control/ADR byte.
    pub fn control_adr(self) -> u8 {
        if self.is_data() {
            0x41
        } else {
            0x01
        }
    }
}

/// A single track, addressed in LBAs relative to the start of the disc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Track {
    pub number: u8,
    pub mode: TrackMode,
    pub start_lba: u32,
    pub sector_count: u32,
    /// Index into the image's file list.
    #[serde(skip)]
    pub file_index: usize,
    /// Byte offset of the track's first sector within its file.
    #[serde(skip)]
    pub file_offset: u64,
}

impl Track {
    /// First LBA past the end of the track.
    pub fn end_lba(&self) -> u32 {
        self.start_lba + self.sector_count
    }

    pub fn contains(&self, lba: u32) -> bool {
        lba >= self.start_lba && lba < self.end_lba()
    }

    pub fn start_fad(&self) -> u32 {
        lba_to_fad(self.start_lba)
    }

    /// Last FAD of the track, inclusive.
    pub fn end_fad(&self) -> u32 {
        lba_to_fad(self.end_lba().saturating_sub(1).max(self.start_lba))
    }
}

/// Parsed table of contents.
///
/// An empty TOC (no tracks) means no usable medium is loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Toc {
    pub tracks: Vec<Track>,
    pub leadout_lba: u32,
}

impl Toc {
    pub fn new(tracks: Vec<Track>, leadout_lba: u32) -> Self {
        Self {
            tracks,
            leadout_lba,
        }
    }

    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Whether a medium with at least one track is loaded.
    pub fn is_ready(&self) -> bool {
        !self.tracks.is_empty()
    }

    pub fn first_track(&self) -> Option<&Track> {
        self.tracks.first()
    }

    pub fn last_track(&self) -> Option<&Track> {
        self.tracks.last()
    }

    pub fn track_for_lba(&self, lba: u32) -> Option<&Track> {
        if lba >= self.leadout_lba {
            return None;
        }
        self.tracks.iter().find(|t| t.contains(lba))
    }

    /// Whether any track is Mode 2 (CD-ROM XA disc type).
    pub fn is_xa(&self) -> bool {
        self.tracks.iter().any(|t| t.mode == TrackMode::Mode2Raw)
    }
}
