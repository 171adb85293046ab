//! Disc parsing and sector read errors.

use std::io;
use std::path::PathBuf;

/// Failure while opening an image or building its table of contents.
#[derive(Debug, thiserror::Error)]
pub enum DiscError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The CUE sheet is malformed.
    #[error("CUE line {line}: {message}")]
    Cue { line: usize, message: String },

    /// A file referenced by a CUE sheet is missing.
    #[error("referenced file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// The image has no recognizable format.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// The image parsed but contains no tracks.
    #[error("image contains no tracks")]
    NoTracks,
}

impl DiscError {
    pub(crate) fn cue(line: usize, message: impl Into<String>) -> Self {
        DiscError::Cue {
            line,
            message: message.into(),
        }
    }
}

/// Failure while reading a single sector.
///
/// [`ReadError::EndOfData`] is the expected way a stream finishes; only
/// [`ReadError::Io`] indicates something went wrong.
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    #[error("no data sector at {lba}")]
    EndOfData { lba: u32 },

    #[error("sector {lba} read failed: {source}")]
    Io {
        lba: u32,
        #[source]
        source: io::Error,
    },
}

impl ReadError {
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, ReadError::EndOfData { .. })
    }
}
