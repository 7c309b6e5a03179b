//! Issue records and the Jira search wire format.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// Person an issue is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignee {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
}

impl Assignee {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            account_id: None,
        }
    }
}

/// An issue as seen by the capacity engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub key: String,
    pub assignee: Option<Assignee>,
    /// Remaining estimate in seconds
    pub remaining_estimate_seconds: Option<i64>,
    /// Raw sprint metadata; informational only, an issue may list several sprints
    #[serde(default)]
    pub sprints: Value,
}

impl Issue {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Default::default()
        }
    }

    pub fn assigned_to(mut self, name: impl Into<String>) -> Self {
        self.assignee = Some(Assignee::named(name));
        self
    }

    pub fn with_remaining(mut self, seconds: i64) -> Self {
        self.remaining_estimate_seconds = Some(seconds);
        self
    }

    /// Build from a Jira search hit, reading the sprint metadata from `sprint_field`.
    pub(crate) fn from_wire(raw: WireIssue, sprint_field: &str) -> Self {
        let mut fields = raw.fields;

        let assignee = match fields.remove("assignee") {
            Some(Value::Null) | None => None,
            Some(value) => match serde_json::from_value::<Assignee>(value) {
                Ok(assignee) => Some(assignee),
                Err(e) => {
                    warn!(
                        "Issue {} has an unreadable assignee, treating as unassigned: {}",
                        raw.key, e
                    );
                    None
                }
            },
        };

        let remaining_estimate_seconds = fields.get("timeestimate").and_then(|v| {
            v.as_i64().or_else(|| v.as_f64().map(|f| f.round() as i64))
        });

        let sprints = fields.remove(sprint_field).unwrap_or(Value::Null);

        Self {
            key: raw.key,
            assignee,
            remaining_estimate_seconds,
            sprints,
        }
    }
}

/// One page of `GET /rest/api/2/search`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchPage {
    #[serde(default)]
    pub start_at: u32,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub issues: Vec<WireIssue>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WireIssue {
    pub key: String,
    #[serde(default)]
    pub fields: Map<String, Value>,
}
