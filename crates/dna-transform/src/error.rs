//! Transform error types.

use dna_core::errors::CoreError;

/// Errors raised while parsing or applying a command.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    /// The command does not begin with `df =`.
    #[error("command must start with 'df ='")]
    MissingPrefix,

    /// Malformed command text. `position` is a 0-based character offset.
    #[error("syntax error at column {}: {message}", position + 1)]
    Syntax { position: usize, message: String },

    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    /// Referenced column does not exist in the working dataset.
    #[error("unknown column '{name}' (available: {})", available.join(", "))]
    UnknownColumn {
        name: String,
        available: Vec<String>,
    },

    /// Wrong number or kind of arguments to an operation or function.
    #[error("invalid arguments to {target}: {message}")]
    InvalidArguments { target: String, message: String },

    /// Operand types do not support the operation.
    #[error("type error: {0}")]
    Type(String),

    /// The resulting table was not rectangular or had duplicate columns.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl TransformError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn args(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArguments {
            target: target.into(),
            message: message.into(),
        }
    }
}
