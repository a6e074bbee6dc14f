//! Pipeline error types.

use dna_db::error::DatabaseError;
use thiserror::Error;

/// Errors surfaced by [`crate::Pipeline::preview_step`].
///
/// Each variant maps onto an HTTP-like status class via
/// [`PipelineError::status_code`] so callers can render them uniformly.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The step, its object, or the object's data file does not exist.
    #[error("{0}")]
    NotFound(String),

    /// The step record cannot be previewed as stored.
    #[error("{0}")]
    InvalidInput(String),

    /// Loading data, synthesizing the command, or executing it failed.
    #[error("{0}")]
    Upstream(String),

    /// The step store itself failed.
    #[error("Storage error: {0}")]
    Storage(#[from] DatabaseError),
}

impl PipelineError {
    /// 404 / 400 / 500 classification.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Upstream(_) | Self::Storage(_) => 500,
        }
    }
}
