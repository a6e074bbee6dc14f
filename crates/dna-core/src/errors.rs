//! Errors raised while building core values.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A dataset was given ragged rows or duplicate column names.
    #[error("Invalid dataset: {0}")]
    Validation(String),
}
