//! Annotation-to-timeline pipeline: collapse batched annotations, categorize
//! and group them into activities, then derive the day's stats.
//!
//! Every stage is a pure function over in-memory data; `build_day` is the
//! only entry point that touches the store.

pub mod categorize;
pub mod dedup;
pub mod group;
pub mod stats;

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::info;
use serde::{Deserialize, Serialize};

use crate::config::TimelineOptions;
use crate::models::{Activity, DailyStats};
use crate::store::AnnotationStore;

pub use categorize::categorize;
pub use dedup::collapse_batches;
pub use group::group_batches;
pub use stats::calculate_stats;

/// One day's finished timeline, ready for the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayTimeline {
    pub date: NaiveDate,
    pub activities: Vec<Activity>,
    pub stats: DailyStats,
}

/// Run the full pipeline for `date`: load the day's annotations plus any
/// unprocessed stragglers from the previous evening, reduce them to
/// activities, and record which annotations were consumed so the next run
/// does not fold them in twice.
pub fn build_day(
    store: &AnnotationStore,
    options: &TimelineOptions,
    date: NaiveDate,
) -> Result<DayTimeline> {
    let annotations = store
        .load_pending(date)
        .with_context(|| format!("failed to load annotations for {date}"))?;

    let batches = collapse_batches(&annotations);
    let activities = group_batches(&batches, options.gap_tolerance());
    let stats = calculate_stats(&activities);

    // Stamps are marked in the day directory they came from, not the day
    // being built, so a straggler picked up across midnight is recorded
    // against its own day's marker file.
    let mut consumed: BTreeMap<NaiveDate, Vec<String>> = BTreeMap::new();
    for annotation in &annotations {
        consumed
            .entry(annotation.timestamp.date())
            .or_default()
            .push(annotation.frame_ref());
    }
    for (day, stamps) in &consumed {
        store
            .mark_processed(*day, stamps)
            .with_context(|| format!("failed to record processed annotations for {day}"))?;
    }

    info!(
        "built timeline for {date}: {} annotations, {} activities",
        annotations.len(),
        activities.len()
    );

    Ok(DayTimeline {
        date,
        activities,
        stats,
    })
}
