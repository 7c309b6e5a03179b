//! Folds probed issues into planned work per member and iteration.

use crate::jira::Assignee;
use crate::models::PlannedWork;

use super::prober::ProbedIteration;

/// Member name used when an assignee carries neither a display name nor an account id.
pub const UNASSIGNED_MEMBER: &str = "Unassigned";

/// Name used to match an assignee against the baseline roster.
pub fn member_name(assignee: &Assignee) -> String {
    let non_blank = |value: &Option<String>| {
        value
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    non_blank(&assignee.display_name)
        .or_else(|| non_blank(&assignee.account_id))
        .unwrap_or_else(|| UNASSIGNED_MEMBER.to_string())
}

/// Sum remaining estimates per `(member, iteration)`.
///
/// Unassigned issues are skipped. Missing estimates count as zero, and so do
/// negative ones. Every probed iteration is recorded, even one whose issues are
/// all unassigned.
pub fn aggregate_planned_work(iterations: &[ProbedIteration]) -> PlannedWork {
    let mut planned = PlannedWork::default();

    for probed in iterations {
        planned.iterations.insert(probed.name());

        for tagged in &probed.issues {
            let Some(assignee) = tagged.issue.assignee.as_ref() else {
                continue;
            };
            let seconds = tagged
                .issue
                .remaining_estimate_seconds
                .map(|s| s.max(0) as u64)
                .unwrap_or(0);

            planned.add(&member_name(assignee), &tagged.iteration, seconds);
        }
    }

    planned
}
