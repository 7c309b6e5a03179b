//! End-to-end report computation for one program increment.
//!
//! Probing and baseline loading are independent: the probe loop runs on the
//! request task while the spreadsheet is parsed on a blocking worker. Both
//! results then feed the aggregator and the merger.

use tracing::info;

use super::aggregator::aggregate_planned_work;
use super::baseline_store::BaselineStore;
use super::merger::merge_capacity;
use super::prober::{IterationProber, ProbeOptions};
use crate::jira::IssueSource;
use crate::models::{CapacityReport, ProgramIncrement};

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("Baseline loader task failed: {0}")]
    BaselineTask(String),
}

/// Compute the capacity report for `pi` from scratch.
pub async fn build_capacity_report(
    source: &dyn IssueSource,
    store: &BaselineStore,
    options: &ProbeOptions,
    pi: &ProgramIncrement,
) -> Result<CapacityReport, ReportError> {
    let baseline_task = tokio::task::spawn_blocking({
        let store = store.clone();
        let pi = pi.clone();
        move || store.load(&pi)
    });

    let probe = IterationProber::new(source, options.clone()).probe(pi).await;

    let baseline = baseline_task
        .await
        .map_err(|e| ReportError::BaselineTask(e.to_string()))?;

    let planned = aggregate_planned_work(&probe.iterations);

    info!(
        "Capacity report for PI {}: {} iterations, {} members, baseline {}",
        pi,
        planned.iterations.len(),
        planned.members.len(),
        baseline
            .as_ref()
            .map(|b| b.source.as_str())
            .unwrap_or("absent")
    );

    Ok(merge_capacity(pi, &planned, baseline, probe.summary))
}
