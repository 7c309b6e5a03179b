//! Capacity data shared by the aggregation, baseline and merge services.
//!
//! All durations are whole seconds. Members are keyed by display name because
//! the issue tracker and the spreadsheet only share names.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::iteration::ProgramIncrement;

pub const SECONDS_PER_HOUR: u64 = 3600;

/// Baseline assumed for a member/iteration the spreadsheet says nothing about.
pub const DEFAULT_BASELINE_HOURS: u64 = 80;

pub const DEFAULT_BASELINE_SECONDS: u64 = DEFAULT_BASELINE_HOURS * SECONDS_PER_HOUR;

/// member -> iteration -> seconds
pub type CapacityMatrix = BTreeMap<String, BTreeMap<String, u64>>;

/// Remaining estimated effort per member and iteration, as read from the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlannedWork {
    /// Accumulated remaining estimate, member -> iteration -> seconds
    pub totals: CapacityMatrix,
    /// Every iteration that returned issues, sorted
    pub iterations: BTreeSet<String>,
    /// Every member with at least one assigned issue, sorted
    pub members: BTreeSet<String>,
}

impl PlannedWork {
    /// Add `seconds` to the running total of `(member, iteration)`.
    pub fn add(&mut self, member: &str, iteration: &str, seconds: u64) {
        let total = self
            .totals
            .entry(member.to_string())
            .or_default()
            .entry(iteration.to_string())
            .or_insert(0);
        *total = total.saturating_add(seconds);
        self.members.insert(member.to_string());
        self.iterations.insert(iteration.to_string());
    }

    pub fn seconds_for(&self, member: &str, iteration: &str) -> Option<u64> {
        self.totals.get(member)?.get(iteration).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }
}

/// Declared available capacity parsed from a baseline spreadsheet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineCapacity {
    /// Roster in sheet order
    pub members: Vec<String>,
    /// member -> iteration -> seconds
    pub capacity: CapacityMatrix,
    /// File name the values were read from
    pub source: String,
}

impl BaselineCapacity {
    pub fn seconds_for(&self, member: &str, iteration: &str) -> Option<u64> {
        self.capacity.get(member)?.get(iteration).copied()
    }
}

/// How planned work compares to the available baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CapacityBand {
    /// ratio <= 1.00
    Normal,
    /// 1.00 < ratio <= 1.05
    Yellow,
    /// ratio > 1.05, or work planned against a zero baseline
    Red,
}

impl CapacityBand {
    /// Classify `planned` against `baseline` (both in seconds).
    ///
    /// Integer comparison keeps the 5% threshold exact.
    pub fn classify(planned: u64, baseline: u64) -> Self {
        if baseline == 0 {
            return if planned > 0 { Self::Red } else { Self::Normal };
        }
        let planned = u128::from(planned);
        let baseline = u128::from(baseline);
        if planned * 100 > baseline * 105 {
            Self::Red
        } else if planned > baseline {
            Self::Yellow
        } else {
            Self::Normal
        }
    }
}

/// Merged view of one member in one iteration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityCell {
    pub planned: u64,
    pub baseline: u64,
    /// planned / baseline, 0 when the baseline is 0
    pub ratio: f64,
    pub band: CapacityBand,
    /// True when the baseline is the default rather than a spreadsheet value
    pub defaulted: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberCapacity {
    pub name: String,
    /// iteration -> planned seconds
    pub capacity: BTreeMap<String, u64>,
    pub allocation: BTreeMap<String, CapacityCell>,
}

/// Why the iteration prober stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// An iteration returned no issues
    Exhausted,
    /// The tracker reported the sprint does not exist
    NotFound,
    /// The tracker failed for another reason; later iterations may be missing
    UpstreamFailure,
    /// The sequence ceiling was hit
    CeilingReached,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeSummary {
    /// Number of queries issued
    pub probed: u32,
    pub stop_reason: StopReason,
    pub detail: Option<String>,
}

impl ProbeSummary {
    /// True when probing ended on a failure that may have truncated the report.
    pub fn is_partial(&self) -> bool {
        matches!(self.stop_reason, StopReason::UpstreamFailure)
    }
}

/// Final report returned to the rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapacityReport {
    pub pi: ProgramIncrement,
    pub iterations: Vec<String>,
    pub members: Vec<MemberCapacity>,
    pub baseline_capacity: Option<BaselineCapacity>,
    pub probe: ProbeSummary,
}

impl CapacityReport {
    pub fn member(&self, name: &str) -> Option<&MemberCapacity> {
        self.members.iter().find(|m| m.name == name)
    }
}
