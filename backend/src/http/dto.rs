//! Data Transfer Objects for the HTTP API.
//!
//! Report and upload payloads are the domain types themselves, which already
//! derive Serialize/Deserialize.

use serde::{Deserialize, Serialize};

pub use crate::models::{
    BaselineCapacity, CapacityBand, CapacityCell, CapacityReport, MemberCapacity, ProbeSummary,
};
pub use crate::services::StoredBaseline;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub issue_source: String,
    pub baseline_dir: String,
}
