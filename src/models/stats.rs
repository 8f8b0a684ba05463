use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Aggregates over one day's activity list. Every field is always present,
/// zero-valued for an empty day; dashboard consumers index these
/// unconditionally.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_activities: usize,
    pub total_secs: i64,
    pub focus_secs: i64,
    pub distraction_secs: i64,
    pub focus_pct: f64,
    pub distraction_pct: f64,
    /// Category label -> seconds, every class included.
    pub category_breakdown: BTreeMap<String, i64>,
}

impl DailyStats {
    /// Seconds spent in categories that count toward neither focus nor
    /// distraction.
    pub fn neutral_secs(&self) -> i64 {
        self.total_secs - self.focus_secs - self.distraction_secs
    }
}
