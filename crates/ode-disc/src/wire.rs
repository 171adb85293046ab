//! Fixed-layout binary TOC served to the drive firmware.
//!
//! The blob is a flat array of [`TOC_ENTRY_SIZE`]-byte entries: one per
//! track followed by the three bookkeeping points `A0` (first track), `A1`
//! (last track) and `A2` (lead-out). Multi-byte fields are big-endian.
//!
//! | offset | field                                   |
//! |--------|-----------------------------------------|
//! | 0      | control/ADR                             |
//! | 1      | point (track number or `0xA0..=0xA2`)   |
//! | 2..5   | absolute start MSF                      |
//! | 5      | mode (0 audio, 1 mode 1, 2 mode 2)      |
//! | 6..8   | stored sector size (`u16`)              |
//! | 8..12  | start FAD (`u32`)                       |
//! | 12..16 | end FAD, inclusive (`u32`)              |

use bytes::{BufMut, Bytes, BytesMut};

use crate::msf::{lba_to_fad, Msf};
use crate::toc::{Toc, Track};

/// Bytes before the first entry. The firmware layout has no preamble.
pub const TOC_HEADER_SIZE: usize = 0;
pub const TOC_ENTRY_SIZE: usize = 16;
/// Entries appended after the tracks: `A0`, `A1`, `A2`.
pub const TOC_RESERVED_ENTRIES: usize = 3;

pub const POINT_FIRST_TRACK: u8 = 0xA0;
pub const POINT_LAST_TRACK: u8 = 0xA1;
pub const POINT_LEADOUT: u8 = 0xA2;

/// Disc type stored in the `A0` entry's second byte.
const DISC_TYPE_CDROM: u8 = 0x00;
const DISC_TYPE_XA: u8 = 0x20;

/// Encoded length for a TOC with `track_count` tracks.
pub fn wire_size(track_count: usize) -> usize {
    TOC_HEADER_SIZE + TOC_ENTRY_SIZE * (track_count + TOC_RESERVED_ENTRIES)
}

/// Serialize `toc` into its wire form. Encoding is deterministic.
pub fn encode_toc(toc: &Toc) -> Bytes {
    let mut buf = BytesMut::with_capacity(wire_size(toc.track_count()));

    for track in &toc.tracks {
        put_track(&mut buf, track);
    }

    let first = toc.first_track();
    let last = toc.last_track();
    let disc_type = if toc.is_xa() {
        DISC_TYPE_XA
    } else {
        DISC_TYPE_CDROM
    };

    put_entry(
        &mut buf,
        first.map(|t| t.mode.control_adr()).unwrap_or(0),
        POINT_FIRST_TRACK,
        Msf::new(first.map(|t| t.number).unwrap_or(0), disc_type, 0),
        0,
        0,
        0,
        0,
    );
    put_entry(
        &mut buf,
        last.map(|t| t.mode.control_adr()).unwrap_or(0),
        POINT_LAST_TRACK,
        Msf::new(last.map(|t| t.number).unwrap_or(0), 0, 0),
        0,
        0,
        0,
        0,
    );

    let leadout_fad = lba_to_fad(toc.leadout_lba);
    put_entry(
        &mut buf,
        last.map(|t| t.mode.control_adr()).unwrap_or(0),
        POINT_LEADOUT,
        Msf::from_frames(leadout_fad),
        0,
        0,
        leadout_fad,
        leadout_fad,
    );

    buf.freeze()
}

fn put_track(buf: &mut BytesMut, track: &Track) {
    put_entry(
        buf,
        track.mode.control_adr(),
        track.number,
        Msf::from_frames(track.start_fad()),
        track.mode.mode_code(),
        track.mode.stored_sector_size() as u16,
        track.start_fad(),
        track.end_fad(),
    );
}

#[allow(clippy::too_many_arguments)]
fn put_entry(
    buf: &mut BytesMut,
    control_adr: u8,
    point: u8,
    msf: Msf,
    mode: u8,
    sector_size: u16,
    start_fad: u32,
    end_fad: u32,
) {
    buf.put_u8(control_adr);
    buf.put_u8(point);
    buf.put_u8(msf.minute);
    buf.put_u8(msf.second);
    buf.put_u8(msf.frame);
    buf.put_u8(mode);
    buf.put_u16(sector_size);
    buf.put_u32(start_fad);
    buf.put_u32(end_fad);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::TrackMode;

    fn sample_toc(track_count: u8) -> Toc {
        let mut tracks = Vec::new();
        let mut lba = 0;
        for n in 1..=track_count {
            let mode = if n == 1 {
                TrackMode::Mode1Raw
            } else {
                TrackMode::Audio
            };
            tracks.push(Track {
                number: n,
                mode,
                start_lba: lba,
                sector_count: 1000,
                file_index: 0,
                file_offset: lba as u64 * 2352,
            });
            lba += 1000;
        }
        Toc::new(tracks, lba)
    }

    #[test]
    fn blob_length_matches_formula() {
        for count in [1u8, 2, 5, 99] {
            let blob = encode_toc(&sample_toc(count));
            assert_eq!(blob.len(), TOC_HEADER_SIZE + TOC_ENTRY_SIZE * (count as usize + 3));
            assert_eq!(blob.len(), wire_size(count as usize));
        }
    }

    #[test]
    fn encoding_is_stable() {
        let toc = sample_toc(3);
        assert_eq!(encode_toc(&toc), encode_toc(&toc));
    }

    #[test]
    fn track_entry_layout() {
        let blob = encode_toc(&sample_toc(2));
        let first = &blob[..TOC_ENTRY_SIZE];
        assert_eq!(first[0], 0x41);
        assert_eq!(first[1], 1);
        // FAD 150 is 00:02:00.
        assert_eq!(&first[2..5], &[0, 2, 0]);
        assert_eq!(first[5], 1);
        assert_eq!(u16::from_be_bytes([first[6], first[7]]), 2352);
        assert_eq!(u32::from_be_bytes(first[8..12].try_into().unwrap()), 150);
        assert_eq!(u32::from_be_bytes(first[12..16].try_into().unwrap()), 1149);

        let second = &blob[TOC_ENTRY_SIZE..2 * TOC_ENTRY_SIZE];
        assert_eq!(second[0], 0x01);
        assert_eq!(second[1], 2);
        assert_eq!(second[5], 0);
        assert_eq!(u32::from_be_bytes(second[8..12].try_into().unwrap()), 1150);
    }

    #[test]
    fn bookkeeping_points_follow_tracks() {
        let blob = encode_toc(&sample_toc(2));
        let a0 = &blob[2 * TOC_ENTRY_SIZE..3 * TOC_ENTRY_SIZE];
        let a1 = &blob[3 * TOC_ENTRY_SIZE..4 * TOC_ENTRY_SIZE];
        let a2 = &blob[4 * TOC_ENTRY_SIZE..];

        assert_eq!(a0[1], POINT_FIRST_TRACK);
        assert_eq!(a0[2], 1);
        assert_eq!(a1[1], POINT_LAST_TRACK);
        assert_eq!(a1[2], 2);
        assert_eq!(a2[1], POINT_LEADOUT);
        assert_eq!(u32::from_be_bytes(a2[8..12].try_into().unwrap()), 2150);
        assert_eq!(Msf::new(a2[2], a2[3], a2[4]), Msf::from_frames(2150));
    }

    #[test]
    fn xa_disc_type_in_a0() {
        let mut toc = sample_toc(1);
        toc.tracks[0].mode = TrackMode::Mode2Raw;
        let blob = encode_toc(&toc);
        assert_eq!(blob[TOC_ENTRY_SIZE + 3], DISC_TYPE_XA);
    }
}
