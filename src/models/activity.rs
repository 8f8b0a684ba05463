use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{Batch, Category};

/// A continuous episode: adjacent same-category batches merged into one span.
/// `summaries` keeps one entry per constituent batch, in order. `icon` and
/// `color` are denormalized from the category so JSON consumers can render
/// the span directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub category: Category,
    pub icon: String,
    pub color: String,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub summaries: Vec<String>,
    pub frame_refs: Vec<String>,
}

impl Activity {
    /// Open a new activity from its first batch.
    pub fn from_batch(category: Category, batch: &Batch) -> Self {
        Self {
            category,
            icon: category.icon().to_string(),
            color: category.color().to_string(),
            start_time: batch.timestamp,
            end_time: batch.end_time,
            summaries: vec![batch.summary.clone()],
            frame_refs: batch.frame_refs.clone(),
        }
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn duration_secs(&self) -> i64 {
        self.duration().num_seconds()
    }

    /// All constituent batch summaries joined for display.
    pub fn combined_summary(&self) -> String {
        self.summaries
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect::<Vec<_>>()
            .join("; ")
    }
}
