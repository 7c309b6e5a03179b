//! In-memory issue source for tests and offline runs.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

use super::source::{IssueQuery, IssueSource, IssueSourceError};
use super::types::Issue;

/// Issue source answering from a fixed table keyed by sprint name.
///
/// Sprints without an entry return no issues, unless a fallback is set.
/// Every query served is recorded so tests can assert on probing order.
#[derive(Default)]
pub struct InMemoryIssueSource {
    responses: HashMap<String, Result<Vec<Issue>, IssueSourceError>>,
    fallback: Option<Vec<Issue>>,
    queries: Mutex<Vec<IssueQuery>>,
}

impl InMemoryIssueSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issues(mut self, sprint: impl Into<String>, issues: Vec<Issue>) -> Self {
        self.responses.insert(sprint.into(), Ok(issues));
        self
    }

    pub fn with_failure(mut self, sprint: impl Into<String>, error: IssueSourceError) -> Self {
        self.responses.insert(sprint.into(), Err(error));
        self
    }

    /// Issues returned for any sprint without an explicit entry.
    pub fn with_fallback(mut self, issues: Vec<Issue>) -> Self {
        self.fallback = Some(issues);
        self
    }

    /// Sprint names queried so far, in order.
    pub fn queried_sprints(&self) -> Vec<String> {
        self.queries
            .lock()
            .iter()
            .filter_map(|q| q.sprint.clone())
            .collect()
    }

    pub fn query_count(&self) -> usize {
        self.queries.lock().len()
    }
}

#[async_trait]
impl IssueSource for InMemoryIssueSource {
    async fn search(&self, query: &IssueQuery) -> Result<Vec<Issue>, IssueSourceError> {
        self.queries.lock().push(query.clone());

        let Some(sprint) = query.sprint.as_deref() else {
            return Ok(Vec::new());
        };

        match self.responses.get(sprint) {
            Some(response) => response.clone(),
            None => Ok(self.fallback.clone().unwrap_or_default()),
        }
    }

    fn describe(&self) -> String {
        format!("in-memory ({} sprints)", self.responses.len())
    }
}
