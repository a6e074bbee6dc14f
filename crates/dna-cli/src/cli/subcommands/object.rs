use std::path::PathBuf;

use clap::Subcommand;

use dna_pipeline::DEFAULT_PAGE_LIMIT;

/// Data object commands.
#[derive(Clone, Debug, Subcommand)]
pub enum ObjectCommands {
    /// Copy a CSV or Parquet file into the bronze tier and register it.
    Ingest {
        /// File to ingest.
        path: PathBuf,
        /// Object name (defaults to the file name).
        #[arg(long)]
        name: Option<String>,
    },
    /// List registered objects.
    List,
    /// Get an object by ID.
    Get { id: i64 },
    /// Page through an object's raw data without applying any step.
    Preview {
        id: i64,
        /// Rows to skip.
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Rows to show (1-500).
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT)]
        limit: usize,
    },
}
