//! Lake error types.

use std::path::PathBuf;

use dna_core::errors::CoreError;

/// Errors from reading or writing tabular files.
#[derive(Debug, thiserror::Error)]
pub enum LakeError {
    /// The file does not exist.
    #[error("Data file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Extension is neither `.parquet` nor `.csv`.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// `DuckDB` could not parse the file.
    #[error("Could not read {}: {reason}", path.display())]
    CorruptData {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying parser message.
        reason: String,
    },

    /// The path does not sit under the bronze tier.
    #[error("Path {} is outside the '{segment}' tier", path.display())]
    OutsideTier { path: PathBuf, segment: String },

    /// A dataset with no columns cannot be written.
    #[error("Cannot write a dataset with no columns")]
    EmptySchema,

    /// `DuckDB` operation failed.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error (directory creation, rename).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Loaded rows did not form a valid dataset.
    #[error(transparent)]
    Core(#[from] CoreError),
}
