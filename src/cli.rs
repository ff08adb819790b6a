use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "osm_tile_slices")]
#[command(
    author,
    version,
    about = "Slice an OSM extract into per-tile fixtures"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse the configured extract and write one slice per tile
    Slice {
        /// JSON configuration file
        #[arg(short, long, value_name = "FILE")]
        config: PathBuf,

        /// Drop cached outputs and recompute everything
        #[arg(short, long)]
        force: bool,
    },
    /// Promote freshly rendered images to expected ones and remove diff images
    Canonize {
        /// Directory holding the rendered images
        #[arg(value_name = "DIR")]
        dir: PathBuf,
    },
}
