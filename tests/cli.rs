//! Command-line parsing

use std::path::PathBuf;

use clap::Parser;
use osm_tile_slices::cli::{Cli, Command};

#[test]
fn test_slice_command() {
    let cli = Cli::parse_from(["osm_tile_slices", "slice", "--config", "config/nano_moscow.json"]);
    match cli.command {
        Command::Slice { config, force } => {
            assert_eq!(config, PathBuf::from("config/nano_moscow.json"));
            assert!(!force);
        },
        Command::Canonize { .. } => panic!("expected slice"),
    }

    let cli = Cli::parse_from(["osm_tile_slices", "slice", "-c", "a.json", "--force"]);
    assert!(matches!(cli.command, Command::Slice { force: true, .. }));
}

#[test]
fn test_canonize_command() {
    let cli = Cli::parse_from(["osm_tile_slices", "canonize", "tests/rendered"]);
    match cli.command {
        Command::Canonize { dir } => assert_eq!(dir, PathBuf::from("tests/rendered")),
        Command::Slice { .. } => panic!("expected canonize"),
    }
}

#[test]
fn test_config_is_required() {
    assert!(Cli::try_parse_from(["osm_tile_slices", "slice"]).is_err());
    assert!(Cli::try_parse_from(["osm_tile_slices"]).is_err());
}
