//! Application state for the HTTP server.

use std::sync::Arc;
use tracing::info;

use crate::config::AppConfig;
use crate::jira::{InMemoryIssueSource, IssueSource, IssueSourceError, JiraClient};
use crate::services::{BaselineStore, ProbeOptions};

/// Shared application state passed to all handlers.
///
/// Everything here is read-only; each request builds its report from scratch.
#[derive(Clone)]
pub struct AppState {
    pub issue_source: Arc<dyn IssueSource>,
    pub baselines: BaselineStore,
    pub probe_options: ProbeOptions,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        issue_source: Arc<dyn IssueSource>,
        baselines: BaselineStore,
        probe_options: ProbeOptions,
    ) -> Self {
        Self {
            issue_source,
            baselines,
            probe_options,
            max_upload_bytes: crate::config::ServerConfig::default().max_upload_bytes,
        }
    }

    pub fn with_max_upload_bytes(mut self, limit: usize) -> Self {
        self.max_upload_bytes = limit;
        self
    }

    /// Build state from configuration.
    ///
    /// Without a Jira base URL the server runs against an empty in-memory
    /// source, so every report is empty but the upload path still works.
    pub fn from_config(config: &AppConfig) -> Result<Self, IssueSourceError> {
        let issue_source: Arc<dyn IssueSource> = if config.jira.base_url.is_some() {
            Arc::new(JiraClient::new(config.jira.clone())?)
        } else {
            info!("JIRA_BASE_URL not set, using an empty in-memory issue source");
            Arc::new(InMemoryIssueSource::new())
        };

        Ok(Self::new(
            issue_source,
            BaselineStore::new(config.storage.baseline_dir.clone()),
            ProbeOptions::from_config(&config.jira),
        )
        .with_max_upload_bytes(config.server.max_upload_bytes))
    }
}
