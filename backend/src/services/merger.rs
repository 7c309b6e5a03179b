//! Merge planned work with baseline capacity.

use std::collections::BTreeMap;

use crate::models::{
    BaselineCapacity, CapacityBand, CapacityCell, CapacityReport, MemberCapacity, PlannedWork,
    ProbeSummary, ProgramIncrement, DEFAULT_BASELINE_SECONDS,
};

/// Compare one planned total against its baseline, falling back to the default.
pub fn allocation_cell(planned: u64, baseline: Option<u64>) -> CapacityCell {
    let defaulted = baseline.is_none();
    let baseline = baseline.unwrap_or(DEFAULT_BASELINE_SECONDS);
    let ratio = if baseline == 0 {
        0.0
    } else {
        planned as f64 / baseline as f64
    };

    CapacityCell {
        planned,
        baseline,
        ratio,
        band: CapacityBand::classify(planned, baseline),
        defaulted,
    }
}

/// Build the report for every `(member, iteration)` present in `planned`.
///
/// Members and iterations come out sorted by name. A pair missing from the
/// baseline, or a missing baseline altogether, gets the default capacity.
pub fn merge_capacity(
    pi: &ProgramIncrement,
    planned: &PlannedWork,
    baseline: Option<BaselineCapacity>,
    probe: ProbeSummary,
) -> CapacityReport {
    let members = planned
        .members
        .iter()
        .map(|name| {
            let totals = planned.totals.get(name).cloned().unwrap_or_default();
            let allocation: BTreeMap<String, CapacityCell> = totals
                .iter()
                .map(|(iteration, seconds)| {
                    let declared = baseline
                        .as_ref()
                        .and_then(|b| b.seconds_for(name, iteration));
                    (iteration.clone(), allocation_cell(*seconds, declared))
                })
                .collect();

            MemberCapacity {
                name: name.clone(),
                capacity: totals,
                allocation,
            }
        })
        .collect();

    CapacityReport {
        pi: pi.clone(),
        iterations: planned.iterations.iter().cloned().collect(),
        members,
        baseline_capacity: baseline,
        probe,
    }
}

#[cfg(test)]
#[path = "merger_tests.rs"]
mod merger_tests;
