use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::paths;

fn default_batch_size() -> u32 {
    1
}

/// On-disk annotation record, exactly as the annotation collaborator writes
/// it. Privacy-synthetic entries omit `image_file`, `sources`, and
/// `batch_size`; unknown keys from other collaborator versions are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotationRecord {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub sources: Vec<String>,
    #[serde(default = "default_batch_size")]
    pub batch_size: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_file: Option<String>,
}

/// One loaded annotation: the record contents plus the frame identity derived
/// from its file name.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub timestamp: NaiveDateTime,
    pub summary: String,
    pub sources: Vec<String>,
    pub batch_size: u32,
    pub image_file: Option<String>,
}

impl Annotation {
    pub fn from_record(timestamp: NaiveDateTime, record: AnnotationRecord) -> Self {
        Self {
            timestamp,
            summary: record.summary,
            sources: record.sources,
            // Records declaring zero frames are malformed; treat as a single.
            batch_size: record.batch_size.max(1),
            image_file: record.image_file,
        }
    }

    /// Frame reference string; identical to the record's file stem.
    pub fn frame_ref(&self) -> String {
        paths::format_stamp(self.timestamp)
    }
}
