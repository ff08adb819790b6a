use std::{fs::File, io::BufReader, ops::RangeInclusive, path::Path};

use serde::{Deserialize, Serialize};

use crate::data::tile::{GeoBBox, MAX_MERCATOR_LAT, MAX_ZOOM};
use crate::errors::Result;

pub const DEFAULT_OUTPUT_FILE_NAME: &str = "test_data.json";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct UserConfig {
    pub data_path: String,
    pub dest_path: String,
    #[serde(default = "default_bbox")]
    pub bbox: GeoBBox,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: u8,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: u8,
    #[serde(default = "default_true")]
    pub with_tags: bool,
    #[serde(default)]
    pub pretty: bool,
    #[serde(default)]
    pub parallel: bool,
    #[serde(default = "default_output_file_name")]
    pub output_file_name: String,
}

// A few blocks around the Kremlin.
fn default_bbox() -> GeoBBox {
    GeoBBox::new(55.750717, 55.756187, 37.608505, 37.619706)
}

fn default_min_zoom() -> u8 {
    14
}

fn default_max_zoom() -> u8 {
    18
}

fn default_true() -> bool {
    true
}

fn default_output_file_name() -> String {
    DEFAULT_OUTPUT_FILE_NAME.to_string()
}

impl UserConfig {
    pub fn new(data_path: &str, dest_path: &str) -> UserConfig {
        UserConfig {
            data_path: data_path.to_string(),
            dest_path: dest_path.to_string(),
            bbox: default_bbox(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            with_tags: true,
            pretty: false,
            parallel: false,
            output_file_name: default_output_file_name(),
        }
    }

    pub fn zooms(&self) -> RangeInclusive<u8> {
        self.min_zoom..=self.max_zoom
    }

    /// Rejects boxes and zoom ranges the tile grid cannot enumerate.
    pub fn validate(&self) -> Result<()> {
        let GeoBBox { south, north, west, east } = self.bbox;
        if [south, north, west, east].iter().any(|value| !value.is_finite()) {
            return Err("Bounding box coordinates must be finite".into());
        }
        if south >= north {
            return Err(format!("Bounding box south ({south}) must be below north ({north})").into());
        }
        if west >= east {
            return Err(format!("Bounding box west ({west}) must be below east ({east})").into());
        }
        if south < -90.0 || north > 90.0 {
            return Err(format!("Bounding box latitudes must lie within [-90, 90], got [{south}, {north}]").into());
        }
        if west < -180.0 || east > 180.0 {
            return Err(format!("Bounding box longitudes must lie within [-180, 180], got [{west}, {east}]").into());
        }
        if south >= MAX_MERCATOR_LAT || north <= -MAX_MERCATOR_LAT {
            return Err(format!(
                "Bounding box [{south}, {north}] lies beyond the tile grid, which ends at ±{MAX_MERCATOR_LAT}"
            ).into());
        }
        if self.min_zoom > self.max_zoom {
            return Err(format!("min_zoom ({}) is above max_zoom ({})", self.min_zoom, self.max_zoom).into());
        }
        if self.max_zoom > MAX_ZOOM {
            return Err(format!("max_zoom ({}) is above the supported maximum {MAX_ZOOM}", self.max_zoom).into());
        }
        Ok(())
    }
}

pub fn load_user_config(path: &Path) -> Result<UserConfig> {
    let file = File::open(path)
        .map_err(|err| format!("Could not open config file {}: {err}", path.display()))?;
    let config: UserConfig = serde_json::from_reader(BufReader::new(file))?;
    config.validate()?;
    Ok(config)
}
