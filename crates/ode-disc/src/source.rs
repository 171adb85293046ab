//! The seam between the stream controller and disc storage.

use std::path::Path;

use crate::error::{DiscError, ReadError};
use crate::image::DiscImage;
use crate::toc::Toc;

/// Provides table-of-contents parsing and per-sector reads.
///
/// Called once per stream tick for consecutive addresses, so `read_sector`
/// must be cheap to call repeatedly.
pub trait SectorSource: Send {
    /// Open `path` and return its TOC. On failure the previously opened
    /// medium, if any, stays in place.
    fn parse_toc(&mut self, path: &Path) -> Result<Toc, DiscError>;

    /// Fill `buf` with the sector at `lba`.
    fn read_sector(&mut self, lba: u32, buf: &mut [u8]) -> Result<(), ReadError>;
}

/// File-backed [`SectorSource`] holding at most one open image.
#[derive(Debug, Default)]
pub struct ImageSource {
    image: Option<DiscImage>,
}

impl ImageSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the currently opened image.
    pub fn current_path(&self) -> Option<&Path> {
        self.image.as_ref().map(|i| i.path())
    }
}

impl SectorSource for ImageSource {
    fn parse_toc(&mut self, path: &Path) -> Result<Toc, DiscError> {
        let image = DiscImage::open(path)?;
        let toc = image.toc().clone();
        self.image = Some(image);
        Ok(toc)
    }

    fn read_sector(&mut self, lba: u32, buf: &mut [u8]) -> Result<(), ReadError> {
        match self.image.as_mut() {
            Some(image) => image.read_sector(lba, buf),
            None => Err(ReadError::EndOfData { lba }),
        }
    }
}
