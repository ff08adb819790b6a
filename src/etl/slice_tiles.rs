use std::collections::BTreeMap;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tqdm::tqdm;

use crate::classify::classify;
use crate::config::UserConfig;
use crate::data::slice::TileSlice;
use crate::data::tile::{tiles_covering, GeoBBox, Tile};
use crate::data::OsmMapData;
use crate::errors::Result;
use crate::etl::{parse_osm, Etl};

pub const ETL_NAME: &str = "slice_tiles";

pub struct SliceTilesEtl<'a> {
    config: &'a UserConfig,
}

/// The part of the configuration a slice file depends on. Stored next to the output;
/// the output is reused only while it matches.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
struct SliceSettings {
    bbox: GeoBBox,
    min_zoom: u8,
    max_zoom: u8,
    with_tags: bool,
    pretty: bool,
}

impl SliceSettings {
    fn of(config: &UserConfig) -> SliceSettings {
        SliceSettings {
            bbox: config.bbox,
            min_zoom: config.min_zoom,
            max_zoom: config.max_zoom,
            with_tags: config.with_tags,
            pretty: config.pretty,
        }
    }
}

fn slice_tile(map_data: &OsmMapData, tile: &Tile, with_tags: bool) -> TileSlice {
    let membership = classify(map_data, tile);
    TileSlice::build(tile, &membership, map_data, with_tags)
}

/// Classifies every tile and returns the slices in the order of `tiles`.
pub fn slice_tiles(map_data: &OsmMapData, tiles: &[Tile], with_tags: bool, parallel: bool) -> Vec<TileSlice> {
    if parallel {
        tiles.par_iter()
            .map(|tile| slice_tile(map_data, tile, with_tags))
            .collect()
    } else {
        tqdm(tiles.iter())
            .map(|tile| slice_tile(map_data, tile, with_tags))
            .collect()
    }
}

fn log_zoom_summary(slices: &[TileSlice]) {
    let mut per_zoom: BTreeMap<u8, (usize, usize)> = BTreeMap::new();
    for slice in slices {
        let (tiles, non_empty) = per_zoom.entry(slice.zoom).or_default();
        *tiles += 1;
        if !slice.is_empty() {
            *non_empty += 1;
        }
    }
    for (zoom, (tiles, non_empty)) in per_zoom {
        info!(etl_name = ETL_NAME, zoom = zoom, tiles = tiles, non_empty = non_empty; "Sliced zoom level");
    }
}

impl SliceTilesEtl<'_> {
    pub fn new(config: &UserConfig) -> SliceTilesEtl<'_> {
        SliceTilesEtl {
            config
        }
    }

    pub fn tiles(&self) -> Vec<Tile> {
        tiles_covering(&self.config.bbox, self.config.zooms())
    }

    /// `<output file>.settings.json`, written after the slices themselves.
    pub fn settings_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}.settings.json", self.config.output_file_name))
    }

    fn stored_settings(&self, dir: &Path) -> Option<SliceSettings> {
        let content = fs::read_to_string(self.settings_path(dir)).ok()?;
        serde_json::from_str(&content).ok()
    }
}

impl Etl for SliceTilesEtl<'_> {
    type Input = OsmMapData;
    type Output = Vec<TileSlice>;

    fn etl_name(&self) -> &str {
        ETL_NAME
    }

    fn output_file_name(&self) -> &str {
        &self.config.output_file_name
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        if !self.output_path(dir).try_exists()? {
            return Ok(false);
        }
        let fresh = self.stored_settings(dir) == Some(SliceSettings::of(self.config));
        if !fresh {
            info!(etl_name = ETL_NAME; "Cached slices were made with other settings");
        }
        Ok(fresh)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        for path in [self.settings_path(dir), self.output_path(dir)] {
            if path.try_exists()? {
                let shown = path.display().to_string();
                info!(etl_name = ETL_NAME, path = shown.as_str(); "Removing cached output");
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn extract(&mut self, dir: &Path) -> Result<Self::Input> {
        parse_osm::read_cache(dir)
    }

    fn transform(&mut self, input: Self::Input) -> Result<Self::Output> {
        let tiles = self.tiles();
        info!(etl_name = ETL_NAME, tiles = tiles.len(), parallel = self.config.parallel; "Classifying tiles");

        let slices = slice_tiles(&input, &tiles, self.config.with_tags, self.config.parallel);
        log_zoom_summary(&slices);
        Ok(slices)
    }

    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()> {
        let settings_path = self.settings_path(dir);
        if settings_path.try_exists()? {
            fs::remove_file(&settings_path)?;
        }

        let mut writer = BufWriter::new(fs::File::create(self.output_path(dir))?);
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut writer, &output)?;
        } else {
            serde_json::to_writer(&mut writer, &output)?;
        }
        writer.flush()?;

        fs::write(settings_path, serde_json::to_string(&SliceSettings::of(self.config))?)?;
        Ok(())
    }
}
