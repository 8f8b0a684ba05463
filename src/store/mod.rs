//! Day-directory annotation store: record scanning, parsing, and the
//! cross-midnight lookback.

mod markers;

use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use log::{debug, warn};

use crate::ledger::retry::RetryPolicy;
use crate::models::{Annotation, AnnotationRecord};
use crate::paths;

pub struct AnnotationStore {
    root: PathBuf,
    policy: RetryPolicy,
}

impl AnnotationStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: RetryPolicy::default(),
        }
    }

    /// Every parseable annotation for `date`, sorted by timestamp. A missing
    /// day directory is an empty day; records that fail to parse are skipped
    /// with a warning and never abort the scan.
    pub fn load_day(&self, date: NaiveDate) -> Result<Vec<Annotation>> {
        let dir = paths::day_dir(&self.root, date);
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => {
                return Err(err).with_context(|| format!("failed to scan {}", dir.display()))
            }
        };

        let mut annotations = Vec::new();
        for entry in entries {
            let entry = entry.with_context(|| format!("failed to scan {}", dir.display()))?;
            let path = entry.path();
            if !is_record_file(&path) {
                continue;
            }
            match load_record(&path) {
                Ok(annotation) => annotations.push(annotation),
                Err(err) => warn!("skipping annotation {}: {err:#}", path.display()),
            }
        }

        annotations.sort_by_key(|annotation| annotation.timestamp);
        Ok(annotations)
    }

    /// Annotations for `date` plus any from the previous day that no run has
    /// folded into an activity yet, sorted by timestamp.
    pub fn load_pending(&self, date: NaiveDate) -> Result<Vec<Annotation>> {
        let mut annotations = match date.pred_opt() {
            Some(previous) => {
                let processed = markers::load(&self.root, previous);
                let stragglers: Vec<Annotation> = self
                    .load_day(previous)?
                    .into_iter()
                    .filter(|annotation| !processed.contains(&annotation.frame_ref()))
                    .collect();
                if !stragglers.is_empty() {
                    debug!(
                        "picked up {} unconsumed annotations from {previous}",
                        stragglers.len()
                    );
                }
                stragglers
            }
            None => Vec::new(),
        };

        annotations.extend(self.load_day(date)?);
        annotations.sort_by_key(|annotation| annotation.timestamp);
        Ok(annotations)
    }

    /// Processed stamp set for `date`.
    pub fn processed(&self, date: NaiveDate) -> BTreeSet<String> {
        markers::load(&self.root, date)
    }

    /// Record `stamps` as folded into activities for `date`.
    pub fn mark_processed(&self, date: NaiveDate, stamps: &[String]) -> Result<()> {
        markers::mark(&self.root, date, stamps, &self.policy)
    }
}

/// Annotation records are non-hidden `.json` files; the processed marker and
/// lock files are dotfiles and never parsed as records.
fn is_record_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| name.starts_with('.'));
    !hidden && path.extension().and_then(|ext| ext.to_str()) == Some("json")
}

fn load_record(path: &Path) -> Result<Annotation> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| anyhow!("non-utf8 file name"))?;
    let timestamp = paths::parse_stamp(stem)?;

    let contents =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let record: AnnotationRecord =
        serde_json::from_str(&contents).context("malformed record")?;

    Ok(Annotation::from_record(timestamp, record))
}
