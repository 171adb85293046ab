//! ode-disc: disc image access for the streaming server.
//!
//! Provides everything below the HTTP layer:
//!
//! - CUE sheet parsing and BIN/ISO image reading ([`cue`], [`image`])
//! - Track layout and MSF/FAD arithmetic ([`toc`], [`msf`])
//! - The [`SectorSource`] seam the stream controller reads through
//! - The fixed-layout TOC wire encoding ([`wire`])
//! - Boot-sector region patches ([`patch`])

pub mod cue;
pub mod error;
pub mod image;
pub mod msf;
pub mod patch;
pub mod source;
pub mod toc;
pub mod wire;

pub use error::{DiscError, ReadError};
pub use image::DiscImage;
pub use msf::Msf;
pub use patch::{AreaCodePatch, SectorPatch};
pub use source::{ImageSource, SectorSource};
pub use toc::{Toc, Track, TrackMode};

/// Size in bytes of one streamed sector (user data of a data sector).
pub const SECTOR_SIZE: usize = 2048;
