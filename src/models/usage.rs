use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One logged external API call. Immutable once written to a day's ledger.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub timestamp: DateTime<Utc>,
    pub api_type: String,
    pub total_tokens: u64,
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

/// On-disk shape of one day's ledger file. `total_tokens` is recomputed from
/// `calls` on every write, never incremented in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyLedger {
    pub date: NaiveDate,
    pub total_tokens: u64,
    #[serde(default)]
    pub calls: Vec<UsageRecord>,
}

impl DailyLedger {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total_tokens: 0,
            calls: Vec::new(),
        }
    }

    pub fn recompute_total(&mut self) {
        self.total_tokens = self.calls.iter().map(|call| call.total_tokens).sum();
    }
}

/// Aggregated view of one day's ledger, zeros when the day has no file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyUsage {
    pub date: NaiveDate,
    pub total_tokens: u64,
    /// api_type -> token total.
    pub by_type: BTreeMap<String, u64>,
    pub records: Vec<UsageRecord>,
}

impl DailyUsage {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_tokens: 0,
            by_type: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    pub fn calls(&self) -> usize {
        self.records.len()
    }
}

/// One day's line in a trailing-window summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_tokens: u64,
    pub by_type: BTreeMap<String, u64>,
}

/// Trailing-window usage report: days with zero usage are omitted from
/// `daily`, which is sorted ascending by date.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    pub days: u32,
    pub total_tokens: u64,
    pub daily: Vec<DaySummary>,
}
