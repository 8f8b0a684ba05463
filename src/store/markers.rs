//! Persisted per-day record of which frames were already folded into
//! activities. The next day's lookback consults this set so late-arriving
//! frames are picked up exactly once.

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::ledger::lock::FileLock;
use crate::ledger::retry::RetryPolicy;
use crate::paths;
use crate::utils::fsx;

#[derive(Debug, Default, Serialize, Deserialize)]
struct MarkerFile {
    #[serde(default)]
    processed: BTreeSet<String>,
}

/// Processed stamp set for `date`. A missing or unreadable marker reads as an
/// empty set; a corrupt one additionally warns, since it means the day's
/// stragglers may be picked up a second time.
pub fn load(root: &Path, date: NaiveDate) -> BTreeSet<String> {
    let path = paths::marker_file(root, date);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return BTreeSet::new(),
        Err(err) => {
            warn!("could not read processed marker {}: {err}", path.display());
            return BTreeSet::new();
        }
    };
    match serde_json::from_str::<MarkerFile>(&contents) {
        Ok(marker) => marker.processed,
        Err(err) => {
            warn!(
                "malformed processed marker {}: {err}; treating day as unprocessed",
                path.display()
            );
            BTreeSet::new()
        }
    }
}

/// Merge `stamps` into the processed set for `date`, under the day's marker
/// lock so a scheduled run and a manual trigger cannot drop each other's
/// updates. An existing marker that cannot be read fails the call rather
/// than being rewritten from only the new stamps.
pub fn mark(root: &Path, date: NaiveDate, stamps: &[String], policy: &RetryPolicy) -> Result<()> {
    if stamps.is_empty() {
        return Ok(());
    }

    let lock_path = paths::marker_lock_file(root, date);
    let _lock = FileLock::acquire(&lock_path, policy)
        .with_context(|| format!("failed to lock processed marker for {date}"))?;

    let mut processed = load_for_update(root, date)?;
    processed.extend(stamps.iter().cloned());
    fsx::write_json_atomic(&paths::marker_file(root, date), &MarkerFile { processed })
        .with_context(|| format!("failed to write processed marker for {date}"))?;
    Ok(())
}

/// Strict read for the update path. Only a missing marker starts empty.
fn load_for_update(root: &Path, date: NaiveDate) -> Result<BTreeSet<String>> {
    let path = paths::marker_file(root, date);
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
        Err(err) => {
            return Err(err)
                .with_context(|| format!("failed to read processed marker {}", path.display()))
        }
    };
    let marker: MarkerFile = serde_json::from_str(&contents)
        .with_context(|| format!("malformed processed marker {}", path.display()))?;
    Ok(marker.processed)
}
