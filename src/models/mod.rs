pub mod activity;
pub mod annotation;
pub mod batch;
pub mod category;
pub mod stats;
pub mod usage;

pub use activity::Activity;
pub use annotation::{Annotation, AnnotationRecord};
pub use batch::Batch;
pub use category::{Category, CategoryClass};
pub use stats::DailyStats;
pub use usage::{DailyLedger, DailyUsage, DaySummary, UsageRecord, UsageSummary};
