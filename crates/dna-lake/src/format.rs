//! File format detection by extension.

use std::fmt;
use std::path::Path;

use crate::LakeError;

/// Tabular formats the lake can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataFormat {
    Parquet,
    Csv,
}

impl DataFormat {
    /// Detect the format from the file extension (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::UnsupportedFormat`] for anything but `.parquet` / `.csv`.
    pub fn from_path(path: &Path) -> Result<Self, LakeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("parquet") => Ok(Self::Parquet),
            Some("csv") => Ok(Self::Csv),
            _ => Err(LakeError::UnsupportedFormat(path.display().to_string())),
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Parquet => "parquet",
            Self::Csv => "csv",
        }
    }

    /// `DuckDB` table function that scans this format.
    pub(crate) const fn reader(self) -> &'static str {
        match self {
            Self::Parquet => "read_parquet",
            Self::Csv => "read_csv_auto",
        }
    }
}

impl fmt::Display for DataFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}
