//! Per-drive session state shared by the TOC and data endpoints.
//!
//! A [`Session`] owns the selected image, its parsed TOC, the sector source
//! and the patch configuration. The stream cursor and scratch buffer live in
//! a [`StreamSlot`] that a data stream takes out of the session for its whole
//! lifetime, which serializes streams without holding the lock across ticks.
//!
//! The slot is leased together with the open sector source, so a stream keeps
//! reading the medium it started on. TOC loads during the stream parse into a
//! fresh source; when the stream ends its source is put back only if no TOC
//! was loaded in the meantime.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::Mutex;

use ode_core::{Error, PatchRegion, Result};
use ode_disc::wire::encode_toc;
use ode_disc::{AreaCodePatch, ImageSource, SectorPatch, SectorSource, Toc, SECTOR_SIZE};

/// Session handle shared between handlers and in-flight streams.
pub type SharedSession = Arc<Mutex<Session>>;

/// Cursor and scratch buffer leased to the active stream.
#[derive(Debug)]
pub struct StreamSlot {
    /// Next sector address to read.
    pub cursor: u32,
    /// One sector of storage, reused for every read.
    pub scratch: Box<[u8]>,
}

impl StreamSlot {
    fn new() -> Self {
        Self {
            cursor: 0,
            scratch: vec![0u8; SECTOR_SIZE].into_boxed_slice(),
        }
    }
}

/// Builds an empty sector source with no medium open.
pub type SourceFactory = Box<dyn Fn() -> Box<dyn SectorSource> + Send + Sync>;

/// Everything an active stream takes out of the session.
pub(crate) struct StreamLease {
    pub slot: StreamSlot,
    pub source: Box<dyn SectorSource>,
    /// TOC generation the source belongs to.
    generation: u64,
}

pub struct Session {
    selected_image: Option<PathBuf>,
    toc: Toc,
    toc_wire: Bytes,
    /// Bumped on every successful TOC load.
    generation: u64,
    patch_region: Option<PatchRegion>,
    source: Box<dyn SectorSource>,
    new_source: SourceFactory,
    patcher: Arc<dyn SectorPatch>,
    slot: Option<StreamSlot>,
}

impl Session {
    pub fn new(
        new_source: impl Fn() -> Box<dyn SectorSource> + Send + Sync + 'static,
        patcher: Arc<dyn SectorPatch>,
        patch_region: Option<PatchRegion>,
    ) -> Self {
        Self {
            selected_image: None,
            toc: Toc::default(),
            toc_wire: Bytes::new(),
            generation: 0,
            patch_region,
            source: new_source(),
            new_source: Box::new(new_source),
            patcher,
            slot: Some(StreamSlot::new()),
        }
    }

    /// Session over disc image files with the boot-header area patch.
    pub fn with_image_source(patch_region: Option<PatchRegion>) -> Self {
        Self::new(
            || -> Box<dyn SectorSource> { Box::new(ImageSource::new()) },
            Arc::new(AreaCodePatch),
            patch_region,
        )
    }

    pub fn into_shared(self) -> SharedSession {
        Arc::new(Mutex::new(self))
    }

    pub fn selected_image(&self) -> Option<&Path> {
        self.selected_image.as_deref()
    }

    /// Record `path` as the image to parse on the next TOC load.
    pub fn select_image(&mut self, path: PathBuf) {
        tracing::debug!(path = %path.display(), "Image selected");
        self.selected_image = Some(path);
    }

    pub fn toc(&self) -> &Toc {
        &self.toc
    }

    /// Wire encoding of the current TOC. Empty until a TOC has been loaded.
    pub fn toc_wire(&self) -> &Bytes {
        &self.toc_wire
    }

    /// Whether a medium with at least one track is loaded.
    pub fn is_ready(&self) -> bool {
        self.toc.is_ready()
    }

    /// Whether a data stream currently holds the stream slot.
    pub fn is_streaming(&self) -> bool {
        self.slot.is_none()
    }

    /// Cursor left by the last stream, or `None` while one is active.
    pub fn stream_cursor(&self) -> Option<u32> {
        self.slot.as_ref().map(|s| s.cursor)
    }

    pub fn patch_region(&self) -> Option<PatchRegion> {
        self.patch_region
    }

    /// Takes effect for the next stream; an active stream keeps the region it
    /// started with.
    pub fn set_patch_region(&mut self, region: Option<PatchRegion>) {
        self.patch_region = region;
    }

    pub fn patcher(&self) -> Arc<dyn SectorPatch> {
        Arc::clone(&self.patcher)
    }

    /// Parse the selected image and replace the current TOC.
    ///
    /// On failure the previous TOC, wire blob and open image stay in place.
    pub fn load_toc(&mut self) -> Result<&Bytes> {
        let Some(path) = self.selected_image.clone() else {
            return Err(Error::toc_parse(Path::new(""), "no image selected"));
        };

        let toc = self
            .source
            .parse_toc(&path)
            .map_err(|e| Error::toc_parse(&path, e))?;

        tracing::debug!(
            path = %path.display(),
            tracks = toc.track_count(),
            leadout_lba = toc.leadout_lba,
            "Parsed TOC"
        );

        self.toc_wire = encode_toc(&toc);
        self.toc = toc;
        self.generation = self.generation.wrapping_add(1);
        Ok(&self.toc_wire)
    }

    /// Take the stream slot and the open medium. The session is left with a
    /// fresh source for TOC loads that arrive mid-stream.
    pub(crate) fn lease_stream(&mut self) -> Option<StreamLease> {
        let slot = self.slot.take()?;
        let source = std::mem::replace(&mut self.source, (self.new_source)());
        Some(StreamLease {
            slot,
            source,
            generation: self.generation,
        })
    }

    pub(crate) fn return_lease(&mut self, lease: StreamLease) {
        let StreamLease {
            slot,
            source,
            generation,
        } = lease;
        if generation == self.generation {
            self.source = source;
        } else {
            tracing::debug!("Medium changed during stream, closing the streamed image");
        }
        self.slot = Some(slot);
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("selected_image", &self.selected_image)
            .field("tracks", &self.toc.track_count())
            .field("patch_region", &self.patch_region)
            .field("streaming", &self.is_streaming())
            .finish_non_exhaustive()
    }
}
