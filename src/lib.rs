//! Core pipeline for turning screen-activity annotations into a daily
//! timeline. Reads the annotation files written by the capture collaborator,
//! collapses batched duplicates, categorizes and groups them into
//! activities with daily stats, and keeps a lock-guarded ledger of AI token
//! spend. Capture, dashboard rendering, and digest generation live in
//! sibling projects; this crate only produces the data they consume.

pub mod config;
pub mod ledger;
pub mod models;
pub mod paths;
pub mod store;
pub mod timeline;
pub mod utils;

pub use config::Config;
pub use ledger::{LedgerError, UsageLedger};
pub use store::AnnotationStore;
pub use timeline::{build_day, DayTimeline};
