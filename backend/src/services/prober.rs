//! Iteration discovery.
//!
//! A program increment does not advertise how many iterations it has, so the
//! prober walks `<PI>_01`, `<PI>_02`, ... against the issue source until an
//! iteration comes back empty, the tracker says the sprint does not exist, or
//! the tracker fails. Probes are strictly sequential: whether to issue the
//! next query depends on the outcome of the current one.

use tracing::{debug, info, warn};

use crate::config::JiraConfig;
use crate::jira::{Issue, IssueQuery, IssueSource, CAPACITY_FIELDS};
use crate::models::{Iteration, ProbeSummary, ProgramIncrement, StopReason};

/// Upper bound on the sequence number, in case the backend never runs dry.
pub const MAX_ITERATION_SEQUENCE: u32 = 50;

/// An issue together with the iteration it was retrieved under.
///
/// The issue's own sprint metadata can list several sprints, so aggregation
/// relies on this tag instead.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedIssue {
    pub iteration: String,
    pub issue: Issue,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbedIteration {
    pub iteration: Iteration,
    pub issues: Vec<TaggedIssue>,
}

impl ProbedIteration {
    pub fn name(&self) -> String {
        self.iteration.name()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeResult {
    /// Iterations that returned issues, in sequence order
    pub iterations: Vec<ProbedIteration>,
    pub summary: ProbeSummary,
}

/// Query settings for the probe loop.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub project: Option<String>,
    pub fields: Vec<String>,
    pub max_sequence: u32,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            project: None,
            fields: CAPACITY_FIELDS.iter().map(|f| f.to_string()).collect(),
            max_sequence: MAX_ITERATION_SEQUENCE,
        }
    }
}

impl ProbeOptions {
    pub fn from_config(config: &JiraConfig) -> Self {
        Self {
            project: config.project.clone(),
            ..Self::default()
        }
    }
}

pub struct IterationProber<'a> {
    source: &'a dyn IssueSource,
    options: ProbeOptions,
}

impl<'a> IterationProber<'a> {
    pub fn new(source: &'a dyn IssueSource, options: ProbeOptions) -> Self {
        Self { source, options }
    }

    /// Walk the iterations of `pi` until a stop condition is met.
    ///
    /// Never fails: tracker errors end the walk and are reported in the summary.
    pub async fn probe(&self, pi: &ProgramIncrement) -> ProbeResult {
        let mut iterations = Vec::new();
        let mut iteration = pi.iteration(1);
        let mut probed: u32 = 0;

        let (stop_reason, detail) = loop {
            if iteration.sequence() > self.options.max_sequence {
                let detail = format!(
                    "Stopped after {} iterations without an empty sprint",
                    self.options.max_sequence
                );
                warn!("PI {}: {}", pi, detail);
                break (StopReason::CeilingReached, Some(detail));
            }

            let name = iteration.name();
            let query = IssueQuery::for_sprint(
                &name,
                self.options.project.as_deref(),
                self.options.fields.clone(),
            );
            probed += 1;

            match self.source.search(&query).await {
                Ok(issues) if issues.is_empty() => {
                    debug!("Iteration {} has no issues, end of PI {}", name, pi);
                    break (StopReason::Exhausted, None);
                }
                Ok(issues) => {
                    info!("Iteration {}: {} issues", name, issues.len());
                    let issues = issues
                        .into_iter()
                        .map(|issue| TaggedIssue {
                            iteration: name.clone(),
                            issue,
                        })
                        .collect();
                    iterations.push(ProbedIteration {
                        iteration: iteration.clone(),
                        issues,
                    });
                    iteration = iteration.next();
                }
                Err(e) if e.is_sprint_not_found() => {
                    debug!("Iteration {} does not exist: {}", name, e);
                    break (StopReason::NotFound, Some(e.to_string()));
                }
                Err(e) => {
                    warn!(
                        "Probing iteration {} failed, report for PI {} may be incomplete: {}",
                        name, pi, e
                    );
                    break (StopReason::UpstreamFailure, Some(e.to_string()));
                }
            }
        };

        ProbeResult {
            iterations,
            summary: ProbeSummary {
                probed,
                stop_reason,
                detail,
            },
        }
    }
}

#[cfg(test)]
#[path = "prober_tests.rs"]
mod prober_tests;
