use std::io;

use clap::Parser;
use log::info;
use structured_logger::json::new_writer;
use structured_logger::Builder;

use osm_tile_slices::canonize::canonize;
use osm_tile_slices::cli::{Cli, Command};
use osm_tile_slices::config::load_user_config;
use osm_tile_slices::etl;
use osm_tile_slices::Result;

fn setup_logging() {
    Builder::with_level("info")
        .with_target_writer("*", new_writer(io::stdout()))
        .init();
}

fn main() -> Result<()> {
    setup_logging();
    let cli = Cli::parse();

    match cli.command {
        Command::Slice { config, force } => {
            let user_config = load_user_config(&config)?;
            let output_path = etl::run(&user_config, force)?;
            let output = output_path.display().to_string();
            info!(output = output.as_str(); "Tile slices written");
        },
        Command::Canonize { dir } => {
            canonize(&dir)?;
        },
    }

    Ok(())
}
