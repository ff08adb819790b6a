pub mod parse_osm;
pub mod slice_tiles;

use std::{fs, path::{Path, PathBuf}};
use log::{info, error};

use crate::config::UserConfig;
use crate::errors::Result;

use self::{parse_osm::ParseOsmEtl, slice_tiles::SliceTilesEtl};

/// One cached step of the pipeline. A step whose output file already exists in the
/// working directory is skipped.
pub trait Etl {
    type Input;
    type Output;

    fn etl_name(&self) -> &str;
    fn output_file_name(&self) -> &str;

    fn extract(&mut self, dir: &Path) -> Result<Self::Input>;
    fn transform(&mut self, input: Self::Input) -> Result<Self::Output>;
    fn load(&mut self, dir: &Path, output: Self::Output) -> Result<()>;

    fn output_path(&self, dir: &Path) -> PathBuf {
        dir.join(self.output_file_name())
    }

    fn is_cached(&self, dir: &Path) -> Result<bool> {
        Ok(self.output_path(dir).try_exists()?)
    }

    fn clean(&self, dir: &Path) -> Result<()> {
        if self.is_cached(dir)? {
            info!(etl_name = self.etl_name(); "Removing cached output");
            fs::remove_file(self.output_path(dir))?;
        }
        Ok(())
    }

    fn process(&mut self, dir: &Path) -> Result<()> {
        info!(etl_name = self.etl_name(); "Starting ETL process");
        if self.is_cached(dir)? {
            info!(etl_name = self.etl_name(); "Using cached value");
        } else {
            info!(etl_name = self.etl_name(); "Extracting");
            let input = self.extract(dir).inspect_err(|err| {
                error!(etl_name = self.etl_name(), err = err.message.as_str(); "Extraction failed with error");
            })?;

            info!(etl_name = self.etl_name(); "Transforming");
            let output = self.transform(input).inspect_err(|err| {
                error!(etl_name = self.etl_name(), err = err.message.as_str(); "Transformation failed with error");
            })?;

            info!(etl_name = self.etl_name(); "Loading");
            self.load(dir, output).inspect_err(|err| {
                error!(etl_name = self.etl_name(), err = err.message.as_str(); "Loading failed with error");
            })?;
        }
        info!(etl_name = self.etl_name(); "Process finished");
        Ok(())
    }
}

/// Working directory of a run: `<dest_path>/<input file name>`, so caches of different
/// extracts never mix.
pub fn create_output_dir(config: &UserConfig) -> Result<PathBuf> {
    let input_fname = Path::new(&config.data_path)
        .file_name()
        .ok_or("Could not get input file name")?;
    let output_dir = Path::new(&config.dest_path).join(input_fname);
    fs::create_dir_all(&output_dir)?;
    Ok(output_dir)
}

/// Parses the extract (or reuses its cache) and writes the tile slices. With `force`,
/// cached outputs of both steps are dropped first. Returns the path of the slice file.
pub fn run(config: &UserConfig, force: bool) -> Result<PathBuf> {
    config.validate()?;
    let output_dir = create_output_dir(config)?;

    let mut parse_osm = ParseOsmEtl::new(config);
    let mut slice_tiles = SliceTilesEtl::new(config);
    if force {
        parse_osm.clean(&output_dir)?;
        slice_tiles.clean(&output_dir)?;
    }

    parse_osm.process(&output_dir)?;
    slice_tiles.process(&output_dir)?;
    Ok(slice_tiles.output_path(&output_dir))
}
