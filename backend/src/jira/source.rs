//! The issue-source seam consumed by the iteration prober.

use async_trait::async_trait;

use super::types::Issue;

/// Fields requested for every capacity query, besides the sprint field.
pub const CAPACITY_FIELDS: &[&str] = &["assignee", "timeestimate"];

/// A search against the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueQuery {
    /// Query expression (JQL)
    pub jql: String,
    /// Fields to return for each issue
    pub fields: Vec<String>,
    /// Sprint the query is scoped to, if any
    pub sprint: Option<String>,
}

impl IssueQuery {
    /// Query every issue of one sprint, optionally restricted to a project.
    pub fn for_sprint(sprint: &str, project: Option<&str>, fields: Vec<String>) -> Self {
        let sprint_clause = format!("sprint = \"{}\"", escape_jql(sprint));
        let jql = match project {
            Some(key) => format!("project = \"{}\" AND {}", escape_jql(key), sprint_clause),
            None => sprint_clause,
        };
        Self {
            jql,
            fields,
            sprint: Some(sprint.to_string()),
        }
    }
}

fn escape_jql(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Failure reported by an issue source.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IssueSourceError {
    /// The tracker answered with a non-success status.
    #[error("Issue source returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never got a response.
    #[error("Issue source transport error: {0}")]
    Transport(String),

    /// The response could not be decoded.
    #[error("Failed to decode issue source response: {0}")]
    Decode(String),
}

impl IssueSourceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the tracker says the queried sprint does not exist.
    ///
    /// Jira answers an unknown sprint name in JQL with a 400 whose message
    /// names the sprint; a bare 404 is treated the same way.
    pub fn is_sprint_not_found(&self) -> bool {
        match self {
            Self::Http { status: 404, .. } => true,
            Self::Http { status: 400, body } => {
                let body = body.to_lowercase();
                body.contains("sprint")
                    && (body.contains("does not exist") || body.contains("not found"))
            }
            _ => false,
        }
    }
}

/// Read access to the issue tracker.
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// by all request handlers.
#[async_trait]
pub trait IssueSource: Send + Sync {
    /// Run a search and return every matching issue.
    async fn search(&self, query: &IssueQuery) -> Result<Vec<Issue>, IssueSourceError>;

    /// Short label for health output and logs.
    fn describe(&self) -> String;
}
