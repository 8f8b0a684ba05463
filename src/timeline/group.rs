//! Gap-tolerant grouping of batches into continuous activities.

use chrono::Duration;

use crate::models::{Activity, Batch};
use crate::timeline::categorize::categorize;

/// Merge chronologically adjacent same-category batches into activities. A
/// batch starting within `gap_tolerance` of the running activity's end
/// extends it (the boundary itself merges); anything else closes the activity
/// and starts the next one.
pub fn group_batches(batches: &[Batch], gap_tolerance: Duration) -> Vec<Activity> {
    let mut activities: Vec<Activity> = Vec::new();
    let mut current: Option<Activity> = None;

    for batch in batches {
        let category = categorize(&batch.summary);
        match &mut current {
            Some(activity)
                if activity.category == category
                    && batch.timestamp - activity.end_time <= gap_tolerance =>
            {
                activity.end_time = activity.end_time.max(batch.end_time);
                activity.summaries.push(batch.summary.clone());
                activity.frame_refs.extend(batch.frame_refs.iter().cloned());
            }
            _ => {
                if let Some(activity) = current.take() {
                    activities.push(activity);
                }
                current = Some(Activity::from_batch(category, batch));
            }
        }
    }

    if let Some(activity) = current.take() {
        activities.push(activity);
    }

    activities
}
