//! Storage of uploaded baseline workbooks.
//!
//! One file per program increment, under its canonical name. An upload
//! replaces the previous file wholesale: bytes are written to a temporary file
//! in the same directory and renamed over the target, so concurrent readers see
//! either the old or the new workbook. Last writer wins.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use super::baseline::{self, canonical_file_name, BASELINE_EXTENSION};
use crate::models::{BaselineCapacity, ProgramIncrement};

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Invalid program increment: {0}")]
    InvalidProgramIncrement(String),

    #[error("Unsupported file '{0}': only .xlsx workbooks are accepted")]
    UnsupportedExtension(String),

    #[error("Failed to store baseline {path}: {message}")]
    Storage { path: PathBuf, message: String },
}

impl UploadError {
    /// True for problems with the request itself rather than the server.
    pub fn is_client_error(&self) -> bool {
        !matches!(self, UploadError::Storage { .. })
    }
}

/// Outcome of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredBaseline {
    pub pi: ProgramIncrement,
    pub filename: String,
    pub bytes: u64,
    pub stored_at: DateTime<Utc>,
}

/// Check an uploaded file name against the accepted extension.
pub fn validate_file_name(name: &str) -> Result<(), UploadError> {
    let accepted = Path::new(name.trim())
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(BASELINE_EXTENSION));

    if accepted {
        Ok(())
    } else {
        Err(UploadError::UnsupportedExtension(name.to_string()))
    }
}

/// Directory of baseline workbooks.
#[derive(Debug, Clone)]
pub struct BaselineStore {
    dir: PathBuf,
}

impl BaselineStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an upload for `pi` is written to.
    pub fn canonical_path(&self, pi: &ProgramIncrement) -> PathBuf {
        self.dir.join(canonical_file_name(pi))
    }

    /// Validate and store an uploaded workbook, replacing any previous one.
    pub async fn store(
        &self,
        pi: &ProgramIncrement,
        original_name: &str,
        contents: &[u8],
    ) -> Result<StoredBaseline, UploadError> {
        validate_file_name(original_name)?;
        if contents.is_empty() {
            return Err(UploadError::MissingField("file"));
        }

        let target = self.canonical_path(pi);
        let storage_error = |message: String| UploadError::Storage {
            path: target.clone(),
            message,
        };

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| storage_error(e.to_string()))?;

        let filename = canonical_file_name(pi);
        let temp = self
            .dir
            .join(format!(".{}.{}.part", filename, Uuid::new_v4()));

        let written = match tokio::fs::write(&temp, contents).await {
            Ok(()) => tokio::fs::rename(&temp, &target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                warn!("Failed to remove partial upload {}: {}", temp.display(), cleanup);
            }
            return Err(storage_error(e.to_string()));
        }

        info!(
            "Stored baseline for PI {} as {} ({} bytes, uploaded as '{}')",
            pi,
            target.display(),
            contents.len(),
            original_name
        );

        Ok(StoredBaseline {
            pi: pi.clone(),
            filename,
            bytes: contents.len() as u64,
            stored_at: Utc::now(),
        })
    }

    /// Parsed baseline for `pi`, if a readable workbook exists. Blocking.
    pub fn load(&self, pi: &ProgramIncrement) -> Option<BaselineCapacity> {
        baseline::load_baseline(&self.dir, pi)
    }
}
