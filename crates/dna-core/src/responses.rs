//! Response types returned as JSON by the pipeline and the `dna` CLI.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::dataset::Value;
use crate::entities::DataObject;
use crate::enums::PublishStatus;

/// Response from previewing a single step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct StepPreview {
    pub step_id: i64,
    pub columns: Vec<String>,
    /// At most the configured preview limit (100 by default).
    pub rows: Vec<Vec<Value>>,
    /// Row count of the full working dataset.
    pub total_rows: usize,
    /// Command that produced this preview; `None` for pass-through steps.
    pub command: Option<String>,
    pub message: String,
}

/// A page of an object's raw data, before any step is applied.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ObjectPreview {
    pub object_id: i64,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
    pub offset: usize,
    pub limit: usize,
    pub total_rows: usize,
}

/// Result of a publish run. Publish never errors; failures are values.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct PublishResult {
    pub status: PublishStatus,
    pub message: String,
    pub output_path: Option<String>,
    /// Step whose command failed during replay.
    pub failed_step: Option<i64>,
    pub steps_applied: u32,
}

impl PublishResult {
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            status: PublishStatus::Failed,
            message: message.into(),
            output_path: None,
            failed_step: None,
            steps_applied: 0,
        }
    }

    #[must_use]
    pub fn failed_at_step(step_id: i64, message: impl Into<String>, steps_applied: u32) -> Self {
        Self {
            failed_step: Some(step_id),
            steps_applied,
            ..Self::failed(message)
        }
    }

    #[must_use]
    pub fn success(output_path: String, steps_applied: u32) -> Self {
        Self {
            status: PublishStatus::Success,
            message: format!("Published to Silver Layer: {output_path}"),
            output_path: Some(output_path),
            failed_step: None,
            steps_applied,
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == PublishStatus::Success
    }
}

/// Response from `dna object ingest`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct IngestResponse {
    pub object: DataObject,
    pub columns: Vec<String>,
    pub row_count: usize,
}
