//! CUE sheet parsing.
//!
//! Only the commands that affect sector layout are interpreted: `FILE`,
//! `TRACK`, `INDEX` and `PREGAP`. Metadata commands are skipped.

use crate::error::DiscError;
use crate::msf::Msf;
use crate::toc::TrackMode;

/// A parsed CUE sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueSheet {
    pub files: Vec<CueFile>,
}

/// A `FILE` entry and the tracks stored in it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueFile {
    pub name: String,
    pub tracks: Vec<CueTrack>,
}

/// A `TRACK` entry. Index times are relative to the start of its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CueTrack {
    pub number: u8,
    pub mode: TrackMode,
    /// Silence not stored in the file (`PREGAP`).
    pub pregap: Option<Msf>,
    pub index0: Option<Msf>,
    pub index1: Msf,
}

/// Parse a CUE sheet from its text content.
pub fn parse_cue(content: &str) -> Result<CueSheet, DiscError> {
    let mut files: Vec<CueFile> = Vec::new();
    let mut pending: Option<PendingTrack> = None;
    let mut pending_line = 0;

    for (i, raw) in content.trim_start_matches('\u{feff}').lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (command, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match command.to_ascii_uppercase().as_str() {
            "FILE" => {
                flush_track(&mut files, pending.take(), pending_line)?;
                let name = parse_file_line(rest, line_no)?;
                files.push(CueFile {
                    name,
                    tracks: Vec::new(),
                });
            }
            "TRACK" => {
                flush_track(&mut files, pending.take(), pending_line)?;
                if files.is_empty() {
                    return Err(DiscError::cue(line_no, "TRACK before FILE"));
                }
                pending = Some(parse_track_line(rest, line_no)?);
                pending_line = line_no;
            }
            "INDEX" => {
                let track = pending
                    .as_mut()
                    .ok_or_else(|| DiscError::cue(line_no, "INDEX before TRACK"))?;
                let (number, msf) = parse_index_line(rest, line_no)?;
                match number {
                    0 => track.index0 = Some(msf),
                    1 => track.index1 = Some(msf),
                    // Sub-indexes do not change the layout.
                    _ => {}
                }
            }
            "PREGAP" => {
                let track = pending
                    .as_mut()
                    .ok_or_else(|| DiscError::cue(line_no, "PREGAP before TRACK"))?;
                let msf = Msf::parse(rest)
                    .ok_or_else(|| DiscError::cue(line_no, format!("invalid PREGAP '{rest}'")))?;
                track.pregap = Some(msf);
            }
            "REM" | "CATALOG" | "CDTEXTFILE" | "TITLE" | "PERFORMER" | "SONGWRITER" | "ISRC"
            | "FLAGS" | "POSTGAP" => {}
            other => {
                tracing::debug!(line = line_no, "Ignoring unknown CUE command {other}");
            }
        }
    }

    flush_track(&mut files, pending.take(), pending_line)?;

    if files.iter().all(|f| f.tracks.is_empty()) {
        return Err(DiscError::NoTracks);
    }

    Ok(CueSheet { files })
}

struct PendingTrack {
    number: u8,
    mode: TrackMode,
    pregap: Option<Msf>,
    index0: Option<Msf>,
    index1: Option<Msf>,
}

fn flush_track(
    files: &mut [CueFile],
    pending: Option<PendingTrack>,
    line_no: usize,
) -> Result<(), DiscError> {
    let Some(t) = pending else {
        return Ok(());
    };
    let index1 = t
        .index1
        .ok_or_else(|| DiscError::cue(line_no, format!("track {} has no INDEX 01", t.number)))?;
    let file = files
        .last_mut()
        .ok_or_else(|| DiscError::cue(line_no, "TRACK before FILE"))?;
    file.tracks.push(CueTrack {
        number: t.number,
        mode: t.mode,
        pregap: t.pregap,
        index0: t.index0,
        index1,
    });
    Ok(())
}

/// Parse the operands of `FILE "name.bin" BINARY`.
fn parse_file_line(rest: &str, line_no: usize) -> Result<String, DiscError> {
    let (name, file_type) = if let Some(quoted) = rest.strip_prefix('"') {
        let end = quoted
            .find('"')
            .ok_or_else(|| DiscError::cue(line_no, "unterminated quote in FILE"))?;
        (&quoted[..end], quoted[end + 1..].trim())
    } else {
        match rest.rsplit_once(char::is_whitespace) {
            Some((name, file_type)) => (name.trim(), file_type.trim()),
            None => (rest, ""),
        }
    };

    if name.is_empty() {
        return Err(DiscError::cue(line_no, "FILE without a name"));
    }

    match file_type.to_ascii_uppercase().as_str() {
        "" | "BINARY" | "MOTOROLA" => Ok(name.to_string()),
        other => Err(DiscError::cue(line_no, format!("unsupported file type {other}"))),
    }
}

/// Parse the operands of `TRACK 01 MODE1/2352`.
fn parse_track_line(rest: &str, line_no: usize) -> Result<PendingTrack, DiscError> {
    let mut parts = rest.split_whitespace();
    let number = parts
        .next()
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|n| (1..=99).contains(n))
        .ok_or_else(|| DiscError::cue(line_no, "invalid track number"))?;
    let keyword = parts
        .next()
        .ok_or_else(|| DiscError::cue(line_no, "TRACK without a mode"))?;
    let mode = TrackMode::from_cue(keyword)
        .ok_or_else(|| DiscError::cue(line_no, format!("unsupported track mode {keyword}")))?;

    Ok(PendingTrack {
        number,
        mode,
        pregap: None,
        index0: None,
        index1: None,
    })
}

/// Parse the operands of `INDEX 01 00:02:00`.
fn parse_index_line(rest: &str, line_no: usize) -> Result<(u8, Msf), DiscError> {
    let mut parts = rest.split_whitespace();
    let number = parts
        .next()
        .and_then(|n| n.parse::<u8>().ok())
        .ok_or_else(|| DiscError::cue(line_no, "invalid index number"))?;
    let msf = parts
        .next()
        .and_then(Msf::parse)
        .ok_or_else(|| DiscError::cue(line_no, "invalid index time"))?;
    Ok((number, msf))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SINGLE_BIN: &str = r#"
REM GENRE Game
FILE "Game (USA).bin" BINARY
  TRACK 01 MODE1/2352
    INDEX 01 00:00:00
  TRACK 02 AUDIO
    INDEX 00 10:00:00
    INDEX 01 10:02:00
"#;

    #[test]
    fn parse_single_file_sheet() {
        let sheet = parse_cue(SINGLE_BIN).unwrap();
        assert_eq!(sheet.files.len(), 1);
        let file = &sheet.files[0];
        assert_eq!(file.name, "Game (USA).bin");
        assert_eq!(file.tracks.len(), 2);
        assert_eq!(file.tracks[0].number, 1);
        assert_eq!(file.tracks[0].mode, TrackMode::Mode1Raw);
        assert_eq!(file.tracks[1].mode, TrackMode::Audio);
        assert_eq!(file.tracks[1].index0, Some(Msf::new(10, 0, 0)));
        assert_eq!(file.tracks[1].index1, Msf::new(10, 2, 0));
    }

    #[test]
    fn parse_multi_file_sheet_with_pregap() {
        let sheet = parse_cue(
            "FILE track01.bin BINARY\n\
             TRACK 01 MODE2/2352\n\
             INDEX 01 00:00:00\n\
             FILE \"track02.bin\" BINARY\n\
             TRACK 02 AUDIO\n\
             PREGAP 00:02:00\n\
             INDEX 01 00:00:00\n",
        )
        .unwrap();
        assert_eq!(sheet.files.len(), 2);
        assert_eq!(sheet.files[0].name, "track01.bin");
        assert_eq!(sheet.files[1].tracks[0].pregap, Some(Msf::new(0, 2, 0)));
    }

    #[test]
    fn byte_order_mark_is_ignored() {
        let sheet = parse_cue("\u{feff}FILE a.bin BINARY\nTRACK 01 MODE1/2048\nINDEX 01 00:00:00\n")
            .unwrap();
        assert_eq!(sheet.files[0].tracks[0].mode, TrackMode::Mode1Cooked);
    }

    #[test]
    fn track_before_file_fails() {
        let err = parse_cue("TRACK 01 MODE1/2352\nINDEX 01 00:00:00\n").unwrap_err();
        assert!(matches!(err, DiscError::Cue { line: 1, .. }));
    }

    #[test]
    fn index_before_track_fails() {
        let err = parse_cue("FILE a.bin BINARY\nINDEX 01 00:00:00\n").unwrap_err();
        assert!(matches!(err, DiscError::Cue { line: 2, .. }));
    }

    #[test]
    fn missing_index_one_fails() {
        let err = parse_cue("FILE a.bin BINARY\nTRACK 01 MODE1/2352\nINDEX 00 00:00:00\n")
            .unwrap_err();
        assert!(err.to_string().contains("no INDEX 01"));
    }

    #[test]
    fn unsupported_mode_fails() {
        let err = parse_cue("FILE a.bin BINARY\nTRACK 01 CDG\n").unwrap_err();
        assert!(err.to_string().contains("unsupported track mode"));
    }

    #[test]
    fn wave_files_are_rejected() {
        let err = parse_cue("FILE \"a.wav\" WAVE\n").unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn empty_sheet_has_no_tracks() {
        assert!(matches!(parse_cue("REM nothing\n"), Err(DiscError::NoTracks)));
    }
}
