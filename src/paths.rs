//! Data root layout shared with the capture/annotation collaborators.
//!
//! The collaborators write one directory of frame records per calendar day
//! and read back the per-day usage ledger files; every path and format they
//! rely on is defined here and nowhere else.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};

/// Subdirectory of the data root holding one directory per calendar day.
pub const FRAMES_DIR: &str = "frames";
/// Subdirectory of the data root holding one ledger file per calendar day.
pub const USAGE_DIR: &str = "token_usage";
/// Per-day hidden file tracking which frame stamps were folded into activities.
pub const PROCESSED_MARKER: &str = ".processed.json";

/// Calendar-day format used for directory and ledger file names.
pub const DATE_FMT: &str = "%Y-%m-%d";
/// Frame stamp format; the file stem of every record within a day directory.
pub const STAMP_FMT: &str = "%Y%m%d_%H%M%S";

pub fn day_dir(root: &Path, date: NaiveDate) -> PathBuf {
    root.join(FRAMES_DIR).join(date.format(DATE_FMT).to_string())
}

pub fn usage_dir(root: &Path) -> PathBuf {
    root.join(USAGE_DIR)
}

pub fn usage_file(root: &Path, date: NaiveDate) -> PathBuf {
    usage_dir(root).join(format!("{}.json", date.format(DATE_FMT)))
}

pub fn usage_lock_file(root: &Path, date: NaiveDate) -> PathBuf {
    usage_dir(root).join(format!(".{}.lock", date.format(DATE_FMT)))
}

pub fn marker_file(root: &Path, date: NaiveDate) -> PathBuf {
    day_dir(root, date).join(PROCESSED_MARKER)
}

pub fn marker_lock_file(root: &Path, date: NaiveDate) -> PathBuf {
    day_dir(root, date).join(".processed.lock")
}

/// Render a frame timestamp as its stamp string. The stamp doubles as the
/// frame reference carried through batches and activities.
pub fn format_stamp(timestamp: NaiveDateTime) -> String {
    timestamp.format(STAMP_FMT).to_string()
}

/// Parse a record file stem back into a frame timestamp.
pub fn parse_stamp(stem: &str) -> Result<NaiveDateTime> {
    NaiveDateTime::parse_from_str(stem, STAMP_FMT)
        .with_context(|| format!("invalid frame stamp {stem}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_stamp_round_trip() {
        let timestamp = NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let stamp = format_stamp(timestamp);
        assert_eq!(stamp, "20250115_103000");
        assert_eq!(parse_stamp(&stamp).unwrap(), timestamp);
    }

    #[test]
    fn test_parse_stamp_rejects_garbage() {
        assert!(parse_stamp("notes").is_err());
        assert!(parse_stamp("20250115").is_err());
        assert!(parse_stamp("20251315_000000").is_err());
    }

    #[test]
    fn test_day_layout() {
        let root = Path::new("/data");
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(day_dir(root, date), Path::new("/data/frames/2025-01-15"));
        assert_eq!(
            usage_file(root, date),
            Path::new("/data/token_usage/2025-01-15.json")
        );
        assert_eq!(
            usage_lock_file(root, date),
            Path::new("/data/token_usage/.2025-01-15.lock")
        );
    }
}
