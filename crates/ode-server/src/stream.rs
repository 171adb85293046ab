//! Sector stream controller.
//!
//! A [`SectorStream`] turns a ranged data request into a sequence of
//! one-sector chunks. It leases the session's [`StreamSlot`](crate::session::StreamSlot)
//! and open medium on [`SectorStream::begin`] and hands them back when the
//! stream completes, is aborted, or is dropped with the connection. Reads go
//! to the leased medium, so a TOC load mid-stream never changes what the
//! stream returns.
//!
//! ```text
//! Idle --begin--> RangeAccepted --advance--> Streaming --EndOfData--> Completed
//!                       |                        |
//!                       +------ abort/drop ------+--------------------> Aborted
//! ```

use std::sync::Arc;

use bytes::Bytes;
use futures_core::Stream;

use ode_core::{Error, PatchRegion, Result};
use ode_disc::patch::PATCHABLE_SECTORS;
use ode_disc::{ReadError, SectorPatch};

use crate::range::{parse_range_header, start_sector};
use crate::session::{SharedSession, StreamLease};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Headers may go out; no sector has been read yet.
    RangeAccepted,
    Streaming,
    /// The source reported end of data. Terminal.
    Completed,
    /// The consumer went away or a read failed. Terminal.
    Aborted,
}

impl StreamState {
    pub fn is_terminal(self) -> bool {
        matches!(self, StreamState::Completed | StreamState::Aborted)
    }
}

/// Outcome of one [`SectorStream::advance`] step.
#[derive(Debug)]
pub enum Tick {
    /// One full sector, already patched.
    More(Bytes),
    /// No more data; the body should end with the terminator chunk.
    Done,
    /// The read failed; the body must end without a terminator.
    Error(ReadError),
}

pub struct SectorStream {
    session: SharedSession,
    /// `None` once handed back to the session.
    lease: Option<StreamLease>,
    cursor: u32,
    patch_region: Option<PatchRegion>,
    patcher: Arc<dyn SectorPatch>,
    state: StreamState,
}

impl SectorStream {
    /// Validate a data request and lease the session's stream slot and medium.
    ///
    /// Checks run in order: medium ready, then range header, then slot
    /// availability. The cursor starts at the sector holding the first
    /// requested byte. The range end is not used.
    pub fn begin(session: &SharedSession, range_header: Option<&str>) -> Result<Self> {
        let mut guard = session.lock();

        if !guard.is_ready() {
            return Err(Error::MediumNotReady);
        }

        let range = range_header.ok_or_else(|| Error::RangeHeaderInvalid("missing".into()))?;
        let (start, _end) = parse_range_header(range)
            .ok_or_else(|| Error::RangeHeaderInvalid(range.to_string()))?;
        let cursor =
            start_sector(start).ok_or_else(|| Error::RangeHeaderInvalid(range.to_string()))?;

        let mut lease = guard.lease_stream().ok_or(Error::StreamBusy)?;
        lease.slot.cursor = cursor;

        tracing::debug!(
            start_byte = start,
            start_lba = cursor,
            region = ?guard.patch_region(),
            "Starting sector stream"
        );

        Ok(Self {
            session: Arc::clone(session),
            lease: Some(lease),
            cursor,
            patch_region: guard.patch_region(),
            patcher: guard.patcher(),
            state: StreamState::RangeAccepted,
        })
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Address of the next sector to be read.
    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    /// Read, patch and emit the sector at the cursor.
    ///
    /// Blocks on the sector source; async callers go through
    /// [`SectorStream::into_body_stream`]. Once terminal, every call returns
    /// [`Tick::Done`] without touching the source.
    pub fn advance(&mut self) -> Tick {
        if self.state.is_terminal() {
            return Tick::Done;
        }
        let Some(lease) = self.lease.as_mut() else {
            self.state = StreamState::Aborted;
            return Tick::Done;
        };
        self.state = StreamState::Streaming;

        let lba = lease.slot.cursor;
        let read = lease.source.read_sector(lba, &mut lease.slot.scratch);

        match read {
            Ok(()) => {
                if let Some(region) = self.patch_region {
                    if PATCHABLE_SECTORS.contains(&lba) {
                        self.patcher.apply(&mut lease.slot.scratch, lba, region);
                        tracing::trace!(lba, %region, "Patched sector");
                    }
                }
                let chunk = Bytes::copy_from_slice(&lease.slot.scratch);
                lease.slot.cursor = lba.saturating_add(1);
                self.cursor = lease.slot.cursor;
                tracing::trace!(lba, "Sent sector");
                Tick::More(chunk)
            }
            Err(ReadError::EndOfData { .. }) => {
                tracing::debug!(lba, "End of data");
                self.finish(StreamState::Completed);
                Tick::Done
            }
            Err(e) => {
                tracing::warn!(lba, error = %e, "Sector read failed, aborting stream");
                self.finish(StreamState::Aborted);
                Tick::Error(e)
            }
        }
    }

    /// Stop streaming. No further reads happen after this.
    pub fn abort(&mut self) {
        if !self.state.is_terminal() {
            tracing::debug!(lba = self.cursor, "Stream aborted");
            self.finish(StreamState::Aborted);
        }
    }

    fn finish(&mut self, state: StreamState) {
        self.state = state;
        if let Some(lease) = self.lease.take() {
            self.session.lock().return_lease(lease);
        }
    }

    /// Drive the controller as an HTTP body stream.
    ///
    /// Every read runs on the blocking pool. The stream ends after
    /// [`Tick::Done`], and yields an error after [`Tick::Error`] so the
    /// connection is cut without a terminator chunk. Dropping the stream
    /// drops the controller, which aborts it.
    pub fn into_body_stream(self) -> impl Stream<Item = std::io::Result<Bytes>> + Send + 'static {
        async_stream::stream! {
            let mut ctl = self;
            loop {
                let joined = tokio::task::spawn_blocking(move || {
                    let tick = ctl.advance();
                    (ctl, tick)
                })
                .await;

                let tick = match joined {
                    Ok((next, tick)) => {
                        ctl = next;
                        tick
                    }
                    Err(e) => {
                        tracing::warn!("Sector read task failed: {e}");
                        yield Err(std::io::Error::other(e));
                        break;
                    }
                };

                match tick {
                    Tick::More(chunk) => yield Ok(chunk),
                    Tick::Done => break,
                    Tick::Error(e) => {
                        yield Err(std::io::Error::other(e));
                        break;
                    }
                }
            }
        }
    }
}

impl Drop for SectorStream {
    fn drop(&mut self) {
        self.abort();
    }
}

impl std::fmt::Debug for SectorStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectorStream")
            .field("cursor", &self.cursor)
            .field("state", &self.state)
            .field("patch_region", &self.patch_region)
            .finish_non_exhaustive()
    }
}
