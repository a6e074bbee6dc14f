use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::StepStatus;

/// One ordered, natural-language-described mutation bound to a data object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransformationStep {
    pub id: i64,
    pub object_id: i64,
    pub name: String,
    pub description: String,
    /// Sparse, strictly increasing per object. Ties are broken by `id`.
    pub order: i64,
    /// Accepted command text; `None` until a synthesis is accepted.
    pub command: Option<String>,
    pub status: StepStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TransformationStep {
    /// Replay sort key.
    #[must_use]
    pub const fn sort_key(&self) -> (i64, i64) {
        (self.order, self.id)
    }
}

/// Compact step listing used by `dna step list --brief`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepSummary {
    pub id: i64,
    pub step_name: String,
    pub step_description: String,
    pub step_order: i64,
}

impl From<&TransformationStep> for StepSummary {
    fn from(step: &TransformationStep) -> Self {
        Self {
            id: step.id,
            step_name: step.name.clone(),
            step_description: step.description.clone(),
            step_order: step.order,
        }
    }
}

/// A recorded status change for a step.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StepEvent {
    pub id: i64,
    pub step_id: i64,
    pub from_status: StepStatus,
    pub to_status: StepStatus,
    /// Failure reason or other context for the change.
    pub detail: Option<String>,
    pub created_at: DateTime<Utc>,
}
