//! Jira REST implementation of [`IssueSource`].

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use super::source::{IssueQuery, IssueSource, IssueSourceError};
use super::types::{Issue, SearchPage};
use crate::config::JiraConfig;

/// Issue source backed by `GET /rest/api/2/search`.
pub struct JiraClient {
    http: reqwest::Client,
    base_url: String,
    config: JiraConfig,
}

impl JiraClient {
    /// Build a client from configuration. Fails when no base URL is set.
    pub fn new(config: JiraConfig) -> Result<Self, IssueSourceError> {
        let base_url = config
            .base_url
            .as_deref()
            .map(|url| url.trim_end_matches('/').to_string())
            .ok_or_else(|| {
                IssueSourceError::Transport("Jira base URL is not configured".to_string())
            })?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                IssueSourceError::Transport(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            http,
            base_url,
            config,
        })
    }

    /// Fields to request: the query's own list plus the configured sprint field.
    fn requested_fields(&self, query: &IssueQuery) -> String {
        let mut fields = query.fields.clone();
        if !fields.iter().any(|f| f == &self.config.sprint_field) {
            fields.push(self.config.sprint_field.clone());
        }
        fields.join(",")
    }

    async fn fetch_page(
        &self,
        query: &IssueQuery,
        start_at: u32,
    ) -> Result<SearchPage, IssueSourceError> {
        let url = format!("{}/rest/api/2/search", self.base_url);
        let fields = self.requested_fields(query);
        let start_at = start_at.to_string();
        let max_results = self.config.page_size.to_string();

        let mut request = self.http.get(&url).query(&[
            ("jql", query.jql.as_str()),
            ("fields", fields.as_str()),
            ("startAt", start_at.as_str()),
            ("maxResults", max_results.as_str()),
        ]);

        request = match (&self.config.user, &self.config.api_token) {
            (Some(user), token) => request.basic_auth(user, token.as_ref()),
            (None, Some(token)) => request.bearer_auth(token),
            (None, None) => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| IssueSourceError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            IssueSourceError::Transport(format!("Failed to read response body: {}", e))
        })?;

        if !status.is_success() {
            return Err(IssueSourceError::Http {
                status: status.as_u16(),
                body: body.trim().to_string(),
            });
        }

        serde_json::from_str(&body).map_err(|e| IssueSourceError::Decode(e.to_string()))
    }
}

#[async_trait]
impl IssueSource for JiraClient {
    async fn search(&self, query: &IssueQuery) -> Result<Vec<Issue>, IssueSourceError> {
        let mut issues = Vec::new();
        let mut start_at: u32 = 0;

        loop {
            let page = self.fetch_page(query, start_at).await?;
            let received = page.issues.len() as u32;
            debug!(
                "Jira page for [{}]: startAt={} received={} total={}",
                query.jql, page.start_at, received, page.total
            );

            issues.extend(
                page.issues
                    .into_iter()
                    .map(|raw| Issue::from_wire(raw, &self.config.sprint_field)),
            );

            start_at = start_at.saturating_add(received);
            if received == 0 || start_at >= page.total {
                break;
            }
        }

        Ok(issues)
    }

    fn describe(&self) -> String {
        format!("jira:{}", self.base_url)
    }
}
