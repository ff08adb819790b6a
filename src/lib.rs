//! Slices an OpenStreetMap extract into per-tile fixtures: for every tile of a bounding
//! box at a range of zoom levels, the nodes, ways and relations that intersect it.

pub mod canonize;
pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod errors;
pub mod etl;

pub use errors::{Error, Result};
