//! Service layer for capacity reconciliation.
//!
//! Dependency order, leaves first:
//!
//! - [`prober`]: discovers the iterations of a program increment
//! - [`aggregator`]: sums remaining estimates per member and iteration
//! - [`baseline`]: locates and parses the baseline spreadsheet
//! - [`baseline_store`]: validates and stores uploaded spreadsheets
//! - [`merger`]: combines both sides and classifies each cell
//! - [`capacity_report`]: runs the whole pipeline for one request

pub mod aggregator;
pub mod baseline;
pub mod baseline_store;
pub mod capacity_report;
pub mod merger;
pub mod prober;

pub use aggregator::aggregate_planned_work;
pub use baseline::load_baseline;
pub use baseline_store::{BaselineStore, StoredBaseline, UploadError};
pub use capacity_report::{build_capacity_report, ReportError};
pub use merger::merge_capacity;
pub use prober::{IterationProber, ProbeOptions, ProbeResult, MAX_ITERATION_SEQUENCE};
