//! Raw-text archive of ingested batches.
//!
//! Layout: `<root>/data_funds/2025-10/2025-10-14.txt` and the same under
//! `data_assets`. It is the layout the bulk loader reads, so an archive
//! directory can be re-imported into a fresh database.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::TrackerError;

/// Entity family of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Funds,
    Assets,
}

impl Family {
    pub const ALL: [Family; 2] = [Family::Funds, Family::Assets];

    pub fn dir_name(&self) -> &'static str {
        match self {
            Family::Funds => "data_funds",
            Family::Assets => "data_assets",
        }
    }
}

pub fn archive_path(root: &Path, family: Family, date: NaiveDate) -> PathBuf {
    root.join(family.dir_name())
        .join(date.format("%Y-%m").to_string())
        .join(format!("{}.txt", date.format("%Y-%m-%d")))
}

/// Write the raw batch text for a date, replacing any previous file
pub fn save_raw(root: &Path, family: Family, date: NaiveDate, text: &str) -> Result<PathBuf> {
    let path = archive_path(root, family, date);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(TrackerError::from)
            .context(format!("Failed to create archive directory {:?}", parent))?;
    }
    fs::write(&path, text)
        .map_err(TrackerError::from)
        .context(format!("Failed to write archive file {:?}", path))?;
    debug!("Archived {} batch at {:?}", family.dir_name(), path);
    Ok(path)
}

/// Remove the archived batch of a date; `false` when there was none
pub fn remove_raw(root: &Path, family: Family, date: NaiveDate) -> Result<bool> {
    let path = archive_path(root, family, date);
    if !path.exists() {
        return Ok(false);
    }
    fs::remove_file(&path)
        .map_err(TrackerError::from)
        .context(format!("Failed to remove archive file {:?}", path))?;
    info!("Removed archive file {:?}", path);
    Ok(true)
}

/// Remove every archived batch dated within [start, end], both families.
/// Returns the number of files removed.
pub fn remove_between(root: &Path, start: NaiveDate, end: NaiveDate) -> Result<usize> {
    let mut removed = 0;
    for date in start.iter_days().take_while(|d| *d <= end) {
        for family in Family::ALL {
            if remove_raw(root, family, date)? {
                removed += 1;
            }
        }
    }
    Ok(removed)
}
