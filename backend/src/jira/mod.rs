//! Issue-tracker collaborator.
//!
//! The capacity engine only depends on the [`IssueSource`] trait. Two
//! implementations are provided:
//!
//! - [`JiraClient`]: Jira REST search with pagination and basic/bearer auth
//! - [`InMemoryIssueSource`]: fixed answers, used by tests and when no tracker is configured

pub mod client;
pub mod memory;
pub mod source;
pub mod types;

pub use client::JiraClient;
pub use memory::InMemoryIssueSource;
pub use source::{IssueQuery, IssueSource, IssueSourceError, CAPACITY_FIELDS};
pub use types::{Assignee, Issue};
