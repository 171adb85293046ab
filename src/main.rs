mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use ode_core::config::Config;
use ode_disc::wire::wire_size;
use ode_disc::{DiscImage, Msf};
use ode_server::catalog::Catalog;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "odestream=trace,ode_server=trace,ode_disc=debug,tower_http=debug".to_string()
        } else {
            "odestream=info,ode_server=info,ode_disc=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Serve {
            host,
            port,
            games_dir,
            image,
            region,
        } => {
            let mut config = Config::load_or_default(cli.config.as_deref());
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            if let Some(dir) = games_dir {
                config.library.games_dir = dir;
            }
            if image.is_some() {
                config.library.initial_image = image;
            }
            if region.is_some() {
                config.stream.patch_region = region;
            }

            tracing::info!(
                games_dir = %config.library.games_dir.display(),
                region = ?config.stream.patch_region,
                "Starting odestream"
            );

            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(ode_server::start(config))?;
            Ok(())
        }
        Commands::Toc { image, json } => print_toc(&image, json),
        Commands::Games { games_dir } => {
            let config = Config::load_or_default(cli.config.as_deref());
            list_games(games_dir, &config)
        }
        Commands::Version => {
            println!("odestream {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn print_toc(path: &Path, json: bool) -> Result<()> {
    let image =
        DiscImage::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let toc = image.toc();

    if json {
        println!("{}", serde_json::to_string_pretty(toc)?);
        return Ok(());
    }

    println!("Image: {}", path.display());
    println!("Tracks: {}", toc.track_count());
    for track in &toc.tracks {
        println!(
            "  {:02} {:<12} start {} (FAD {:>6})  {:>6} sectors",
            track.number,
            format!("{:?}", track.mode),
            Msf::from_frames(track.start_fad()),
            track.start_fad(),
            track.sector_count,
        );
    }
    println!(
        "Lead-out: {} (LBA {})",
        Msf::from_frames(ode_disc::msf::lba_to_fad(toc.leadout_lba)),
        toc.leadout_lba
    );
    println!("Wire size: {} bytes", wire_size(toc.track_count()));

    Ok(())
}

fn list_games(games_dir: Option<PathBuf>, config: &Config) -> Result<()> {
    let dir = games_dir.unwrap_or_else(|| config.library.games_dir.clone());
    let catalog = Catalog::scan(&dir, &config.library.extensions);

    if catalog.is_empty() {
        println!("No games found in {}", dir.display());
        return Ok(());
    }

    for entry in catalog.entries() {
        println!("{:>4}  {}  ({})", entry.id, entry.name, entry.path.display());
    }

    Ok(())
}
