use clap::{Parser, Subcommand};
use ode_core::PatchRegion;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "odestream")]
#[command(author, version, about = "Optical drive emulator streaming server")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve TOC and sector data to the drive
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory scanned for disc images
        #[arg(long)]
        games_dir: Option<PathBuf>,

        /// Image to load before the first TOC request
        #[arg(long)]
        image: Option<PathBuf>,

        /// Patch boot sectors for this region (name or symbol, e.g. "usa" or "U")
        #[arg(long)]
        region: Option<PatchRegion>,
    },

    /// Parse a disc image and display its table of contents
    Toc {
        /// CUE sheet, ISO or raw BIN image
        #[arg(required = true)]
        image: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List catalog ids for the games directory
    Games {
        /// Directory to scan (overrides config)
        #[arg(long)]
        games_dir: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
