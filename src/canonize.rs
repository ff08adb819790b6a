//! Housekeeping for the directory of rendered comparison images: freshly rendered
//! `<n>.png` files become the new `<n>_expected.png` references and stale
//! `*_diff.png` files are dropped.

use std::fs;
use std::path::{Path, PathBuf};

use log::info;
use regex::Regex;

use crate::errors::Result;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CanonizeReport {
    pub removed: Vec<PathBuf>,
    pub promoted: Vec<(PathBuf, PathBuf)>,
}

pub fn canonize(dir: &Path) -> Result<CanonizeReport> {
    let rendered = Regex::new(r"^(?<index>\d+)\.png$")?;
    let diff = Regex::new(r"_diff\.png$")?;

    let mut file_names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            file_names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    file_names.sort();

    let mut report = CanonizeReport::default();
    for file_name in file_names {
        let path = dir.join(&file_name);
        if diff.is_match(&file_name) {
            fs::remove_file(&path)?;
            report.removed.push(path);
        } else if let Some(captures) = rendered.captures(&file_name) {
            let expected = dir.join(format!("{}_expected.png", &captures["index"]));
            fs::copy(&path, &expected)?;
            fs::remove_file(&path)?;
            report.promoted.push((path, expected));
        }
    }

    let dir_name = dir.display().to_string();
    info!(
        dir = dir_name.as_str(),
        removed = report.removed.len(),
        promoted = report.promoted.len();
        "Canonized rendered images"
    );
    Ok(report)
}
