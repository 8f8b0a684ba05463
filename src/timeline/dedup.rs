//! Collapse identical-summary annotation runs back into their originating
//! batches.
//!
//! The annotator stamps every frame of one summarization call with the same
//! summary text and the call's frame count. Rebuilding the batch means
//! folding consecutive identical summaries until that declared count is
//! reached; a shorter run (a call cut off at midnight) still closes and
//! emits.

use crate::models::{Annotation, Batch};

struct OpenBatch {
    batch: Batch,
    expected: u32,
}

impl OpenBatch {
    fn is_full(&self) -> bool {
        self.batch.frame_refs.len() as u32 >= self.expected
    }
}

/// Fold an ordered annotation list into batches. Output is re-sorted by
/// timestamp; ordering across the midnight merge is not trusted.
pub fn collapse_batches(annotations: &[Annotation]) -> Vec<Batch> {
    let mut batches: Vec<Batch> = Vec::new();
    let mut open: Option<OpenBatch> = None;

    for annotation in annotations {
        match &mut open {
            Some(current)
                if annotation.batch_size > 1 && current.batch.summary == annotation.summary =>
            {
                current.batch.frame_refs.push(annotation.frame_ref());
                current.batch.end_time = current.batch.end_time.max(annotation.timestamp);
            }
            _ => {
                if let Some(current) = open.take() {
                    batches.push(current.batch);
                }
                let batch = Batch::from_annotation(annotation);
                if annotation.batch_size <= 1 {
                    batches.push(batch);
                } else {
                    open = Some(OpenBatch {
                        batch,
                        expected: annotation.batch_size,
                    });
                }
            }
        }

        if open.as_ref().map_or(false, OpenBatch::is_full) {
            if let Some(current) = open.take() {
                batches.push(current.batch);
            }
        }
    }

    if let Some(current) = open.take() {
        batches.push(current.batch);
    }

    batches.sort_by_key(|batch| batch.timestamp);
    batches
}
