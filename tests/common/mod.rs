//! Shared test harness for integration tests.
//!
//! Provides [`TestHarness`], which writes a small games directory into a
//! temporary folder and builds a full [`AppContext`] over it. The
//! [`TestHarness::with_server`] constructor serves it on a random port for
//! socket-level testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;

use ode_core::config::Config;
use ode_core::PatchRegion;
use ode_disc::SECTOR_SIZE;
use ode_server::context::AppContext;
use ode_server::router::build_router;

/// Sectors in `alpha.iso`. Sector `n` is filled with byte `n`.
pub const ISO_SECTORS: usize = 20;
/// Data sectors in `bravo.cue`, followed by an audio track.
pub const CUE_DATA_SECTORS: usize = 6;
pub const CUE_AUDIO_SECTORS: usize = 4;

pub const ALPHA_ID: i64 = 0;
pub const BRAVO_ID: i64 = 1;
pub const BROKEN_ID: i64 = 2;

const SYNC: [u8; 12] = [
    0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x00,
];

/// Harness wrapping an [`AppContext`] over a temporary games directory.
///
/// Catalog order is `alpha.iso` (0), `bravo.cue` (1), `broken.cue` (2).
pub struct TestHarness {
    pub ctx: AppContext,
    pub dir: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        Self::with_region(None)
    }

    pub fn with_region(region: Option<PatchRegion>) -> Self {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        write_games(dir.path());

        let mut config = Config::default();
        config.library.games_dir = dir.path().to_path_buf();
        config.stream.patch_region = region;

        let ctx = AppContext::from_config(config);
        Self { ctx, dir }
    }

    pub fn router(&self) -> Router {
        build_router(self.ctx.clone())
    }

    pub fn game_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Serve the router on a random port with the production accept loop.
    /// Cancel the returned token to stop accepting.
    pub async fn with_server(self) -> (Self, SocketAddr, CancellationToken) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind random port");
        let addr = listener.local_addr().expect("failed to get local addr");
        let cancel = CancellationToken::new();

        let app = self.router();
        let token = cancel.clone();
        tokio::spawn(async move {
            ode_server::run_accept_loop(listener, app, token).await;
        });

        (self, addr, cancel)
    }
}

/// Expected user data of `alpha.iso` sector `lba`.
pub fn iso_sector(lba: usize) -> Vec<u8> {
    vec![lba as u8; SECTOR_SIZE]
}

/// Expected user data of `bravo.cue` data sector `lba`.
pub fn cue_sector(lba: usize) -> Vec<u8> {
    vec![0xB0 + lba as u8; SECTOR_SIZE]
}

fn raw_mode1_sector(fill: u8) -> Vec<u8> {
    let mut sector = vec![0u8; 2352];
    sector[..12].copy_from_slice(&SYNC);
    sector[15] = 1;
    sector[16..16 + SECTOR_SIZE].fill(fill);
    sector
}

fn write_games(dir: &Path) {
    let iso: Vec<u8> = (0..ISO_SECTORS).flat_map(iso_sector).collect();
    std::fs::write(dir.join("alpha.iso"), iso).unwrap();

    let mut bin = Vec::new();
    for i in 0..CUE_DATA_SECTORS {
        bin.extend(raw_mode1_sector(0xB0 + i as u8));
    }
    bin.extend(vec![0u8; 2352 * CUE_AUDIO_SECTORS]);
    std::fs::write(dir.join("bravo.bin"), bin).unwrap();

    let cue = format!(
        "FILE \"bravo.bin\" BINARY\n\
         TRACK 01 MODE1/2352\n\
         INDEX 01 00:00:00\n\
         TRACK 02 AUDIO\n\
         INDEX 01 00:00:{CUE_DATA_SECTORS:02}\n"
    );
    std::fs::write(dir.join("bravo.cue"), cue).unwrap();

    std::fs::write(dir.join("broken.cue"), "FILE \"nowhere.bin\" BINARY\n").unwrap();
}
