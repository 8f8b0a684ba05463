//! Concurrency-safe daily token usage ledger.
//!
//! One JSON file per calendar day under `token_usage/`. Writers from any
//! process serialize on a sibling lock file, then replace the day file
//! atomically, so readers never observe a half-written ledger and no write
//! interleaving can drop a record. Readers take no lock.

pub mod lock;
pub mod retry;

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, Utc};
use log::warn;
use thiserror::Error;

use crate::models::{DailyLedger, DailyUsage, DaySummary, UsageRecord, UsageSummary};
use crate::paths;
use crate::utils::fsx;
use lock::FileLock;

pub use retry::RetryPolicy;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// The day's lock stayed busy through the whole retry budget.
    #[error("usage ledger for {date} is locked (gave up logging {api_type} after {attempts} attempts)")]
    Contention {
        date: NaiveDate,
        api_type: String,
        attempts: u32,
    },
    #[error("usage ledger I/O failure: {0}")]
    Io(#[from] io::Error),
}

impl LedgerError {
    /// Contention is transient; the caller's next cycle may succeed.
    pub fn is_retriable(&self) -> bool {
        matches!(self, LedgerError::Contention { .. })
    }
}

pub struct UsageLedger {
    root: PathBuf,
    policy: RetryPolicy,
}

impl UsageLedger {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_policy(root, RetryPolicy::default())
    }

    pub fn with_policy(root: impl Into<PathBuf>, policy: RetryPolicy) -> Self {
        Self {
            root: root.into(),
            policy,
        }
    }

    /// Append one usage record to today's ledger. Zero-token calls are
    /// dropped without touching the file.
    pub fn log(
        &self,
        api_type: &str,
        total_tokens: u64,
        prompt_tokens: u64,
        completion_tokens: u64,
        context: Option<String>,
    ) -> Result<(), LedgerError> {
        self.log_at(
            Local::now(),
            api_type,
            total_tokens,
            prompt_tokens,
            completion_tokens,
            context,
        )
    }

    /// `log` with the clock pinned; the record lands in the ledger for
    /// `now`'s calendar date.
    pub fn log_at(
        &self,
        now: DateTime<Local>,
        api_type: &str,
        total_tokens: u64,
        prompt_tokens: u64,
        completion_tokens: u64,
        context: Option<String>,
    ) -> Result<(), LedgerError> {
        if total_tokens == 0 {
            return Ok(());
        }

        let date = now.date_naive();
        let _lock = FileLock::acquire(&paths::usage_lock_file(&self.root, date), &self.policy)
            .map_err(|err| self.classify(err, date, api_type))?;

        let mut ledger = self.read_for_append(date)?;
        ledger.calls.push(UsageRecord {
            timestamp: now.with_timezone(&Utc),
            api_type: api_type.to_string(),
            total_tokens,
            prompt_tokens,
            completion_tokens,
            context,
        });
        ledger.recompute_total();

        fsx::write_json_atomic(&paths::usage_file(&self.root, date), &ledger)?;
        Ok(())
    }

    /// Aggregates for one day. A missing day file reads as zero usage.
    pub fn get_daily_usage(&self, date: NaiveDate) -> Result<DailyUsage, LedgerError> {
        let ledger = match self.read_day(date)? {
            Some(ledger) => ledger,
            None => return Ok(DailyUsage::empty(date)),
        };

        let mut by_type: BTreeMap<String, u64> = BTreeMap::new();
        for call in &ledger.calls {
            *by_type.entry(call.api_type.clone()).or_insert(0) += call.total_tokens;
        }

        Ok(DailyUsage {
            date,
            total_tokens: ledger.total_tokens,
            by_type,
            records: ledger.calls,
        })
    }

    /// Trailing-window report ending today.
    pub fn get_summary(&self, days: u32) -> Result<UsageSummary, LedgerError> {
        self.summary_ending(Local::now().date_naive(), days)
    }

    /// Trailing-window report ending at `end` (inclusive). Days with zero
    /// usage are omitted; the rest are ascending by date.
    pub fn summary_ending(&self, end: NaiveDate, days: u32) -> Result<UsageSummary, LedgerError> {
        let mut daily = Vec::new();
        let mut total_tokens = 0u64;

        // The window stops at the calendar floor; dates before NaiveDate::MIN
        // are not representable.
        let floor = end.signed_duration_since(NaiveDate::MIN).num_days();
        let window = i64::from(days).min(floor + 1);

        for offset in (0..window).rev() {
            let date = end - chrono::Duration::days(offset);
            let usage = self.get_daily_usage(date)?;
            if usage.total_tokens == 0 {
                continue;
            }
            total_tokens += usage.total_tokens;
            daily.push(DaySummary {
                date,
                total_tokens: usage.total_tokens,
                by_type: usage.by_type,
            });
        }

        Ok(UsageSummary {
            days,
            total_tokens,
            daily,
        })
    }

    fn day_path(&self, date: NaiveDate) -> PathBuf {
        paths::usage_file(&self.root, date)
    }

    /// Read one day's file for reporting; `None` when absent, `Err` only for
    /// real I/O failures. A file that exists but does not parse reads as
    /// empty, with a warning, so one corrupt day never wedges the reports.
    fn read_day(&self, date: NaiveDate) -> Result<Option<DailyLedger>, LedgerError> {
        let path = self.day_path(date);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(LedgerError::Io(err)),
        };
        match serde_json::from_str(&contents) {
            Ok(ledger) => Ok(Some(ledger)),
            Err(err) => {
                warn!("malformed ledger {}: {err}", path.display());
                Ok(Some(DailyLedger::new(date)))
            }
        }
    }

    /// Strict read for the append path. Only an absent file starts a fresh
    /// day; an existing file that cannot be read or parsed fails the append
    /// rather than being replaced by a rebuilt-empty ledger.
    fn read_for_append(&self, date: NaiveDate) -> Result<DailyLedger, LedgerError> {
        let path = self.day_path(date);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(DailyLedger::new(date))
            }
            Err(err) => return Err(LedgerError::Io(err)),
        };
        serde_json::from_str(&contents).map_err(|err| {
            LedgerError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("malformed ledger {}: {err}", path.display()),
            ))
        })
    }

    fn classify(&self, err: io::Error, date: NaiveDate, api_type: &str) -> LedgerError {
        if err.kind() == io::ErrorKind::WouldBlock {
            LedgerError::Contention {
                date,
                api_type: api_type.to_string(),
                attempts: self.policy.attempts(),
            }
        } else {
            LedgerError::Io(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::time::Duration as StdDuration;
    use tempfile::tempdir;

    fn noon(year: i32, month: u32, day: u32) -> DateTime<Local> {
        Local.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 2,
            base_delay: StdDuration::from_millis(1),
            max_delay: StdDuration::from_millis(2),
            multiplier: 2.0,
        }
    }

    #[test]
    fn test_log_creates_day_file_with_recomputed_total() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());
        let now = noon(2025, 1, 15);

        ledger
            .log_at(now, "annotation", 300, 200, 100, None)
            .unwrap();
        ledger
            .log_at(now, "digest", 700, 400, 300, Some("daily digest".into()))
            .unwrap();

        let date = now.date_naive();
        let raw = fs::read_to_string(paths::usage_file(dir.path(), date)).unwrap();
        let day: DailyLedger = serde_json::from_str(&raw).unwrap();
        assert_eq!(day.date, date);
        assert_eq!(day.total_tokens, 1000);
        assert_eq!(day.calls.len(), 2);
        assert_eq!(day.calls[1].context.as_deref(), Some("daily digest"));
    }

    #[test]
    fn test_zero_token_call_is_a_noop() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());
        let now = noon(2025, 1, 15);

        ledger.log_at(now, "annotation", 0, 0, 0, None).unwrap();
        assert!(!paths::usage_file(dir.path(), now.date_naive()).exists());

        ledger.log_at(now, "annotation", 5, 5, 0, None).unwrap();
        ledger.log_at(now, "annotation", 0, 0, 0, None).unwrap();
        let usage = ledger.get_daily_usage(now.date_naive()).unwrap();
        assert_eq!(usage.calls(), 1);
    }

    #[test]
    fn test_write_leaves_no_tmp_file() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());
        ledger
            .log_at(noon(2025, 1, 15), "digest", 42, 40, 2, None)
            .unwrap();

        let tmp_files: Vec<_> = fs::read_dir(paths::usage_dir(dir.path()))
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .filter(|name| name.to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(tmp_files.is_empty());
    }

    #[test]
    fn test_stored_total_trusted_when_calls_missing() {
        let dir = tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        fs::create_dir_all(paths::usage_dir(dir.path())).unwrap();
        fs::write(
            paths::usage_file(dir.path(), date),
            r#"{"date": "2025-01-15", "totalTokens": 500}"#,
        )
        .unwrap();

        let ledger = UsageLedger::new(dir.path());
        let usage = ledger.get_daily_usage(date).unwrap();
        assert_eq!(usage.total_tokens, 500);
        assert!(usage.by_type.is_empty());
        assert_eq!(usage.calls(), 0);
    }

    #[test]
    fn test_corrupt_day_file_reads_as_empty() {
        let dir = tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        fs::create_dir_all(paths::usage_dir(dir.path())).unwrap();
        fs::write(paths::usage_file(dir.path(), date), "{not json").unwrap();

        let ledger = UsageLedger::new(dir.path());
        let usage = ledger.get_daily_usage(date).unwrap();
        assert_eq!(usage.total_tokens, 0);
        assert_eq!(usage.calls(), 0);
    }

    #[test]
    fn test_append_refuses_unreadable_day_file() {
        let dir = tempdir().unwrap();
        let now = noon(2025, 1, 15);
        let path = paths::usage_file(dir.path(), now.date_naive());
        fs::create_dir_all(paths::usage_dir(dir.path())).unwrap();
        fs::write(&path, b"\xff\xfe{\"date\": \"2025-01-15\"}").unwrap();

        let ledger = UsageLedger::new(dir.path());
        let err = ledger.log_at(now, "digest", 100, 60, 40, None).unwrap_err();
        assert!(matches!(err, LedgerError::Io(_)));
        assert!(!err.is_retriable());
        assert_eq!(fs::read(&path).unwrap(), b"\xff\xfe{\"date\": \"2025-01-15\"}");
    }

    #[test]
    fn test_append_refuses_malformed_day_file() {
        let dir = tempdir().unwrap();
        let now = noon(2025, 1, 15);
        let path = paths::usage_file(dir.path(), now.date_naive());
        fs::create_dir_all(paths::usage_dir(dir.path())).unwrap();
        fs::write(&path, "{not json").unwrap();

        let ledger = UsageLedger::new(dir.path());
        let err = ledger.log_at(now, "digest", 100, 60, 40, None).unwrap_err();
        assert!(matches!(err, LedgerError::Io(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{not json");
    }

    #[test]
    fn test_daily_usage_aggregates_by_type() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());
        let now = noon(2025, 1, 15);

        ledger.log_at(now, "annotation", 100, 60, 40, None).unwrap();
        ledger.log_at(now, "annotation", 150, 90, 60, None).unwrap();
        ledger.log_at(now, "digest", 500, 300, 200, None).unwrap();

        let usage = ledger.get_daily_usage(now.date_naive()).unwrap();
        assert_eq!(usage.total_tokens, 750);
        assert_eq!(usage.by_type.get("annotation"), Some(&250));
        assert_eq!(usage.by_type.get("digest"), Some(&500));
        assert_eq!(usage.calls(), 3);
    }

    #[test]
    fn test_missing_day_reads_as_zero() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let usage = ledger.get_daily_usage(date).unwrap();
        assert_eq!(usage.date, date);
        assert_eq!(usage.total_tokens, 0);
        assert!(usage.by_type.is_empty());
        assert!(usage.records.is_empty());
    }

    #[test]
    fn test_summary_skips_zero_days_and_sorts() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());

        ledger
            .log_at(noon(2025, 1, 13), "digest", 200, 150, 50, None)
            .unwrap();
        ledger
            .log_at(noon(2025, 1, 15), "annotation", 300, 200, 100, None)
            .unwrap();

        let end = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let summary = ledger.summary_ending(end, 7).unwrap();
        assert_eq!(summary.days, 7);
        assert_eq!(summary.total_tokens, 500);
        assert_eq!(summary.daily.len(), 2);
        assert_eq!(
            summary.daily[0].date,
            NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()
        );
        assert_eq!(summary.daily[1].date, end);
        assert!(summary.daily[0].date < summary.daily[1].date);
    }

    #[test]
    fn test_summary_window_clamped_at_calendar_floor() {
        let dir = tempdir().unwrap();
        let ledger = UsageLedger::new(dir.path());
        let end = NaiveDate::MIN + chrono::Duration::days(2);

        let summary = ledger.summary_ending(end, u32::MAX).unwrap();
        assert_eq!(summary.days, u32::MAX);
        assert_eq!(summary.total_tokens, 0);
        assert!(summary.daily.is_empty());
    }

    #[test]
    fn test_contention_surfaces_retriable_error() {
        let dir = tempdir().unwrap();
        let now = noon(2025, 1, 15);
        let date = now.date_naive();

        let _held = FileLock::acquire(
            &paths::usage_lock_file(dir.path(), date),
            &RetryPolicy::default(),
        )
        .unwrap();

        let ledger = UsageLedger::with_policy(dir.path(), fast_policy());
        let err = ledger
            .log_at(now, "digest", 10, 5, 5, None)
            .unwrap_err();
        assert!(err.is_retriable());
        let message = err.to_string();
        assert!(message.contains("2025-01-15"));
        assert!(message.contains("digest"));
        assert!(matches!(err, LedgerError::Contention { attempts: 2, .. }));
    }

    #[test]
    fn test_concurrent_writers_preserve_every_record() {
        let dir = tempdir().unwrap();
        let root = dir.path().to_path_buf();
        let now = noon(2025, 1, 15);

        // Short delays but a deep attempt budget: the point here is
        // additivity under interleaving, not the give-up path.
        let patient = RetryPolicy {
            max_attempts: 200,
            base_delay: StdDuration::from_millis(1),
            max_delay: StdDuration::from_millis(5),
            multiplier: 2.0,
        };

        let mut handles = Vec::new();
        for writer in 0..10u64 {
            let root = root.clone();
            handles.push(std::thread::spawn(move || {
                let ledger = UsageLedger::with_policy(root, patient);
                ledger
                    .log_at(now, "annotation", 10, 6, 4, Some(format!("writer {writer}")))
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let ledger = UsageLedger::new(&root);
        let usage = ledger.get_daily_usage(now.date_naive()).unwrap();
        assert_eq!(usage.total_tokens, 100);
        assert_eq!(usage.calls(), 10);
    }
}
