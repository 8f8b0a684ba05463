use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::Annotation;

/// A deduplicated annotation: one summarization call's output, spanning every
/// frame that call covered. `timestamp` is the earliest member frame,
/// `end_time` the latest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Batch {
    pub timestamp: NaiveDateTime,
    pub end_time: NaiveDateTime,
    pub summary: String,
    pub frame_refs: Vec<String>,
}

impl Batch {
    pub fn from_annotation(annotation: &Annotation) -> Self {
        Self {
            timestamp: annotation.timestamp,
            end_time: annotation.timestamp,
            summary: annotation.summary.clone(),
            frame_refs: vec![annotation.frame_ref()],
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frame_refs.len()
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.timestamp
    }
}
