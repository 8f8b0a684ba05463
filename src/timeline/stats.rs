//! Daily aggregates over an activity list.

use std::collections::BTreeMap;

use crate::models::{Activity, CategoryClass, DailyStats};

/// Reduce activities into the day's totals. Total function: the empty list
/// yields a fully populated zero struct, and percentages never divide by
/// zero.
pub fn calculate_stats(activities: &[Activity]) -> DailyStats {
    let mut total_secs = 0i64;
    let mut focus_secs = 0i64;
    let mut distraction_secs = 0i64;
    let mut category_breakdown: BTreeMap<String, i64> = BTreeMap::new();

    for activity in activities {
        let secs = activity.duration_secs();
        total_secs += secs;
        match activity.category.class() {
            CategoryClass::Focus => focus_secs += secs,
            CategoryClass::Distraction => distraction_secs += secs,
            CategoryClass::Neutral => {}
        }
        *category_breakdown
            .entry(activity.category.label().to_string())
            .or_insert(0) += secs;
    }

    let (focus_pct, distraction_pct) = if total_secs > 0 {
        let total = total_secs as f64;
        (
            focus_secs as f64 / total * 100.0,
            distraction_secs as f64 / total * 100.0,
        )
    } else {
        (0.0, 0.0)
    };

    DailyStats {
        total_activities: activities.len(),
        total_secs,
        focus_secs,
        distraction_secs,
        focus_pct,
        distraction_pct,
        category_breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 15)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn activity(category: Category, start: NaiveDateTime, end: NaiveDateTime) -> Activity {
        Activity {
            category,
            icon: category.icon().to_string(),
            color: category.color().to_string(),
            start_time: start,
            end_time: end,
            summaries: vec!["s".into()],
            frame_refs: Vec::new(),
        }
    }

    #[test]
    fn test_focus_and_distraction_split() {
        let activities = vec![
            activity(Category::Code, at(10, 0, 0), at(10, 30, 0)),
            activity(Category::Video, at(10, 35, 0), at(10, 45, 0)),
        ];

        let stats = calculate_stats(&activities);
        assert_eq!(stats.total_activities, 2);
        assert_eq!(stats.total_secs, 2400);
        assert_eq!(stats.focus_secs, 1800);
        assert_eq!(stats.distraction_secs, 600);
        assert_eq!(stats.focus_pct, 75.0);
        assert_eq!(stats.distraction_pct, 25.0);
    }

    #[test]
    fn test_neutral_counts_toward_total_only() {
        let activities = vec![
            activity(Category::Code, at(9, 0, 0), at(9, 30, 0)),
            activity(Category::Meeting, at(9, 30, 0), at(10, 0, 0)),
            activity(Category::Social, at(10, 0, 0), at(10, 30, 0)),
        ];

        let stats = calculate_stats(&activities);
        assert_eq!(
            stats.focus_secs + stats.distraction_secs + stats.neutral_secs(),
            stats.total_secs
        );
        assert_eq!(stats.neutral_secs(), 1800);
        assert!(stats.focus_pct >= 0.0 && stats.focus_pct <= 100.0);
        assert!(stats.distraction_pct >= 0.0 && stats.distraction_pct <= 100.0);
    }

    #[test]
    fn test_breakdown_sums_to_total() {
        let activities = vec![
            activity(Category::Code, at(9, 0, 0), at(9, 20, 0)),
            activity(Category::Code, at(9, 40, 0), at(9, 50, 0)),
            activity(Category::Email, at(10, 0, 0), at(10, 5, 0)),
        ];

        let stats = calculate_stats(&activities);
        assert_eq!(stats.category_breakdown.get("Code"), Some(&1800));
        assert_eq!(stats.category_breakdown.get("Email"), Some(&300));
        let breakdown_total: i64 = stats.category_breakdown.values().sum();
        assert_eq!(breakdown_total, stats.total_secs);
    }

    #[test]
    fn test_empty_input_is_all_zeros() {
        let stats = calculate_stats(&[]);
        assert_eq!(stats, DailyStats::default());
        assert_eq!(stats.total_activities, 0);
        assert_eq!(stats.total_secs, 0);
        assert_eq!(stats.focus_pct, 0.0);
        assert_eq!(stats.distraction_pct, 0.0);
        assert!(stats.category_breakdown.is_empty());
        assert!(!stats.focus_pct.is_nan());
    }
}
