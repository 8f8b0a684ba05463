//! Runtime configuration, read once at startup from a JSON file written by
//! the settings UI (or by hand). Unknown keys are ignored so older builds
//! tolerate newer config files.

use anyhow::{bail, Context, Result};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::{fs, io, path::Path, path::PathBuf};

/// Knobs consumed by the timeline pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineOptions {
    /// Largest pause, in minutes, still bridged when grouping batches into
    /// one activity.
    pub gap_minutes: u32,
    /// Threshold used by downstream digest views to hide low-traffic days.
    /// Recorded here so one file carries the whole surface; this core does
    /// no filtering with it.
    pub min_tokens_per_bucket: u64,
}

impl Default for TimelineOptions {
    fn default() -> Self {
        Self {
            gap_minutes: 5,
            min_tokens_per_bucket: 50,
        }
    }
}

impl TimelineOptions {
    pub fn gap_tolerance(&self) -> Duration {
        Duration::minutes(i64::from(self.gap_minutes))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Data root holding the `frames/` and `token_usage/` trees.
    pub root_dir: PathBuf,
    pub timeline: TimelineOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_dir: default_root(),
            timeline: TimelineOptions::default(),
        }
    }
}

impl Config {
    /// Read configuration from `path`. A missing file means defaults; a file
    /// that exists but does not parse is an error rather than a silent
    /// fallback, so a typo cannot quietly revert settings.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read config from {}", path.display()))
            }
        };
        let config: Self = serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeline.gap_minutes == 0 {
            bail!("gap_minutes must be at least 1");
        }
        Ok(())
    }
}

fn default_root() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".traceline"))
        .unwrap_or_else(|| PathBuf::from(".traceline"))
}
