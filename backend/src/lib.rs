//! # Capacity Planner Backend
//!
//! Team capacity reconciliation service.
//!
//! The backend compares the remaining work planned in the issue tracker's
//! sprints with the working hours each member declared in an uploaded
//! baseline spreadsheet, and flags over-allocation per member and iteration.
//!
//! ## Architecture
//!
//! - [`models`]: program increments, iterations, and report types
//! - [`jira`]: the issue-source trait, the Jira REST client, and an in-memory source
//! - [`services`]: iteration prober, planned-work aggregator, baseline loader and store, merger
//! - [`config`]: startup configuration from the environment or a TOML file
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! A report request walks the iterations of a program increment, sums the
//! remaining estimates of every assigned issue, parses the baseline workbook if
//! one exists, and merges both sides, substituting a default of 80 hours where
//! the baseline is silent.

pub mod config;
pub mod jira;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
