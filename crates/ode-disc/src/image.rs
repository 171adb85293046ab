//! Disc image reader for CUE/BIN and ISO images.
//!
//! [`DiscImage::open`] resolves the image into a [`Toc`] plus one open file
//! handle per backing file. [`DiscImage::read_sector`] then maps a logical
//! block address to its track and copies the sector's user data out.

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use crate::cue::{self, CueFile};
use crate::error::{DiscError, ReadError};
use crate::toc::{Toc, Track, TrackMode};
use crate::SECTOR_SIZE;

/// Sync pattern at the start of every raw data sector.
const SYNC_PATTERN: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// An opened disc image.
#[derive(Debug)]
pub struct DiscImage {
    path: PathBuf,
    toc: Toc,
    files: Vec<File>,
}

impl DiscImage {
    /// Open an image, choosing the format from the file extension.
    pub fn open(path: &Path) -> Result<Self, DiscError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        let image = match ext.as_str() {
            "cue" => Self::open_cue(path)?,
            "iso" => Self::open_single(path, TrackMode::Mode1Cooked)?,
            "bin" | "img" => {
                let mode = detect_raw_mode(path)?;
                Self::open_single(path, mode)?
            }
            other => {
                return Err(DiscError::UnsupportedFormat(format!(
                    "unknown extension '{other}' for {}",
                    path.display()
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            tracks = image.toc.track_count(),
            leadout = image.toc.leadout_lba,
            "Opened disc image"
        );
        Ok(image)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Read the user data of the sector at `lba` into `buf`.
    ///
    /// `buf` must be exactly [`SECTOR_SIZE`] bytes. Audio sectors, gaps and
    /// addresses at or past the lead-out report [`ReadError::EndOfData`].
    pub fn read_sector(&mut self, lba: u32, buf: &mut [u8]) -> Result<(), ReadError> {
        if buf.len() != SECTOR_SIZE {
            return Err(ReadError::Io {
                lba,
                source: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    format!("sector buffer is {} bytes, expected {SECTOR_SIZE}", buf.len()),
                ),
            });
        }

        let track = match self.toc.track_for_lba(lba) {
            Some(t) if t.mode.is_data() => *t,
            _ => return Err(ReadError::EndOfData { lba }),
        };

        let relative = (lba - track.start_lba) as u64;
        let offset = track.file_offset
            + relative * track.mode.stored_sector_size()
            + track.mode.user_data_offset();

        let file = &mut self.files[track.file_index];
        let result = file
            .seek(SeekFrom::Start(offset))
            .and_then(|_| file.read_exact(buf));

        match result {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Err(ReadError::EndOfData { lba }),
            Err(source) => Err(ReadError::Io { lba, source }),
        }
    }

    fn open_single(path: &Path, mode: TrackMode) -> Result<Self, DiscError> {
        let file = File::open(path)?;
        let frames = (file.metadata()?.len() / mode.stored_sector_size()) as u32;
        if frames == 0 {
            return Err(DiscError::NoTracks);
        }

        let track = Track {
            number: 1,
            mode,
            start_lba: 0,
            sector_count: frames,
            file_index: 0,
            file_offset: 0,
        };

        Ok(Self {
            path: path.to_path_buf(),
            toc: Toc::new(vec![track], frames),
            files: vec![file],
        })
    }

    fn open_cue(path: &Path) -> Result<Self, DiscError> {
        let content = std::fs::read_to_string(path)?;
        let sheet = cue::parse_cue(&content)?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));

        let mut files = Vec::with_capacity(sheet.files.len());
        let mut tracks = Vec::new();
        // Disc LBA where the current file's first stored frame lands.
        let mut file_base_lba: u32 = 0;
        // Pregap frames that exist on disc but not in any file.
        let mut gap_frames: u32 = 0;

        for (file_index, cue_file) in sheet.files.iter().enumerate() {
            let file_path = base.join(&cue_file.name);
            let file = File::open(&file_path).map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => DiscError::MissingFile(file_path.clone()),
                _ => DiscError::Io(e),
            })?;
            let len = file.metadata()?.len();
            files.push(file);

            let Some(first) = cue_file.tracks.first() else {
                continue;
            };
            let sector_size = first.mode.stored_sector_size();
            if cue_file
                .tracks
                .iter()
                .any(|t| t.mode.stored_sector_size() != sector_size)
            {
                return Err(DiscError::UnsupportedFormat(format!(
                    "{} mixes sector sizes",
                    cue_file.name
                )));
            }

            let file_frames = (len / sector_size) as u32;
            for (i, t) in cue_file.tracks.iter().enumerate() {
                if let Some(gap) = t.pregap {
                    gap_frames += gap.to_frames();
                }
                let start = t.index1.to_frames();
                let end = next_track_start(cue_file, i).unwrap_or(file_frames);
                if end < start {
                    return Err(DiscError::UnsupportedFormat(format!(
                        "track {} starts past the end of {}",
                        t.number, cue_file.name
                    )));
                }

                tracks.push(Track {
                    number: t.number,
                    mode: t.mode,
                    start_lba: file_base_lba + gap_frames + start,
                    sector_count: end - start,
                    file_index,
                    file_offset: start as u64 * sector_size,
                });
            }

            file_base_lba += file_frames;
        }

        if tracks.is_empty() {
            return Err(DiscError::NoTracks);
        }

        Ok(Self {
            path: path.to_path_buf(),
            toc: Toc::new(tracks, file_base_lba + gap_frames),
            files,
        })
    }
}

/// Frame (within the file) where the track after `i` begins, counting its
/// stored pregap (`INDEX 00`) as part of the next track.
fn next_track_start(file: &CueFile, i: usize) -> Option<u32> {
    file.tracks
        .get(i + 1)
        .map(|next| next.index0.unwrap_or(next.index1).to_frames())
}

/// Sniff a headerless `.bin` to decide between raw and cooked sectors.
fn detect_raw_mode(path: &Path) -> Result<TrackMode, DiscError> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let mut header = [0u8; 16];
    if file.read_exact(&mut header).is_ok() && header[..12] == SYNC_PATTERN {
        return match header[15] {
            1 => Ok(TrackMode::Mode1Raw),
            2 => Ok(TrackMode::Mode2Raw),
            mode => Err(DiscError::UnsupportedFormat(format!(
                "raw sector mode {mode} in {}",
                path.display()
            ))),
        };
    }
    if len % SECTOR_SIZE as u64 == 0 {
        return Ok(TrackMode::Mode1Cooked);
    }
    Err(DiscError::UnsupportedFormat(format!(
        "{} is neither raw nor 2048-byte sectors",
        path.display()
    )))
}
