//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer for business logic.

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{BaselineCapacity, CapacityReport, HealthResponse, StoredBaseline};
use super::error::AppError;
use super::state::AppState;
use crate::models::ProgramIncrement;
use crate::services::{baseline_store, build_capacity_report, UploadError};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_pi(raw: &str) -> Result<ProgramIncrement, AppError> {
    ProgramIncrement::new(raw).map_err(AppError::BadRequest)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        issue_source: state.issue_source.describe(),
        baseline_dir: state.baselines.dir().display().to_string(),
    }))
}

// =============================================================================
// Capacity Report
// =============================================================================

/// GET /v1/capacity/{pi}
///
/// Probe the iterations of `pi`, aggregate remaining estimates, and merge them
/// with the uploaded baseline. Always computed from scratch.
pub async fn get_capacity_report(
    State(state): State<AppState>,
    Path(pi): Path<String>,
) -> HandlerResult<CapacityReport> {
    let pi = parse_pi(&pi)?;

    let report = build_capacity_report(
        state.issue_source.as_ref(),
        &state.baselines,
        &state.probe_options,
        &pi,
    )
    .await?;

    Ok(Json(report))
}

// =============================================================================
// Baselines
// =============================================================================

/// GET /v1/baselines/{pi}
///
/// Parsed baseline for `pi`, or `null` when none has been uploaded.
pub async fn get_baseline(
    State(state): State<AppState>,
    Path(pi): Path<String>,
) -> HandlerResult<Option<BaselineCapacity>> {
    let pi = parse_pi(&pi)?;
    let store = state.baselines.clone();

    let baseline = tokio::task::spawn_blocking(move || store.load(&pi))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok(Json(baseline))
}

/// POST /v1/baselines
///
/// Multipart form with a `pi` text field and a `file` field holding an
/// `.xlsx` workbook. Replaces any previous baseline of the same PI.
pub async fn upload_baseline(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<StoredBaseline>), AppError> {
    let mut pi: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("pi") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read 'pi': {}", e)))?;
                pi = Some(value);
            }
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                // Reject before buffering the body
                baseline_store::validate_file_name(&filename)?;
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read 'file': {}", e)))?;
                file = Some((filename, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let pi = pi
        .filter(|p| !p.trim().is_empty())
        .ok_or(UploadError::MissingField("pi"))?;
    let pi = ProgramIncrement::new(pi).map_err(UploadError::InvalidProgramIncrement)?;
    let (filename, contents) = file.ok_or(UploadError::MissingField("file"))?;

    let stored = state.baselines.store(&pi, &filename, &contents).await?;

    Ok((StatusCode::CREATED, Json(stored)))
}
