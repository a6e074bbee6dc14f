//! # dna-lake
//!
//! Tabular file access for the data lake.
//!
//! The lake is a directory tree split into tiers:
//! - `<root>/bronze/upload/<YYYY-MM-DD>/<file>.parquet` holds raw ingested data
//! - `<root>/silver/...` mirrors the bronze layout with cleaned output
//!
//! `DuckDB` does the parsing and Parquet encoding; everything else works on
//! the in-memory [`Dataset`].

pub mod error;
pub mod format;
mod store;

pub use error::LakeError;
pub use format::DataFormat;

use std::path::{Component, Path, PathBuf};

use chrono::{NaiveDate, Utc};

use dna_config::LakeConfig;
use dna_core::dataset::Dataset;

const UPLOAD_DIR: &str = "upload";

/// Result of copying a file into the bronze tier.
#[derive(Debug, Clone)]
pub struct IngestedFile {
    /// Location of the Parquet copy.
    pub path: PathBuf,
    pub columns: Vec<String>,
    pub row_count: usize,
}

/// Handle on a lake directory.
#[derive(Debug, Clone)]
pub struct TabularStore {
    root: PathBuf,
    bronze: String,
    silver: String,
}

impl TabularStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>, bronze: &str, silver: &str) -> Self {
        Self {
            root: root.into(),
            bronze: bronze.to_string(),
            silver: silver.to_string(),
        }
    }

    #[must_use]
    pub fn from_config(config: &LakeConfig) -> Self {
        Self::new(
            config.root_path(),
            &config.bronze_segment,
            &config.silver_segment,
        )
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/<bronze>/upload`.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.root.join(&self.bronze).join(UPLOAD_DIR)
    }

    /// Load a Parquet or CSV file.
    ///
    /// # Errors
    ///
    /// - [`LakeError::UnsupportedFormat`] for an unknown extension
    /// - [`LakeError::NotFound`] if the file does not exist
    /// - [`LakeError::CorruptData`] if `DuckDB` cannot parse it
    pub fn load(&self, path: &Path) -> Result<Dataset, LakeError> {
        store::read_dataset(path)
    }

    /// Write `dataset` to `path` as Parquet, creating parent directories.
    ///
    /// Writing the same dataset twice yields the same file contents.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::EmptySchema`] for a column-less dataset, or a
    /// `DuckDB`/IO error if encoding or the final rename fails.
    pub fn write(&self, dataset: &Dataset, path: &Path) -> Result<(), LakeError> {
        store::write_parquet(dataset, path)
    }

    /// Locate the raw upload for an object by id, preferring Parquet over CSV.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::NotFound`] if neither file exists.
    pub fn resolve_format(&self, object_id: i64) -> Result<PathBuf, LakeError> {
        let dir = self.upload_dir();
        for format in [DataFormat::Parquet, DataFormat::Csv] {
            let candidate = dir.join(format!("{object_id}.{}", format.extension()));
            if candidate.is_file() {
                return Ok(candidate);
            }
        }
        Err(LakeError::NotFound(dir.join(format!("{object_id}.*"))))
    }

    /// Silver-tier destination for a bronze-tier file.
    ///
    /// # Errors
    ///
    /// Returns [`LakeError::OutsideTier`] if `path` has no bronze component.
    pub fn silver_path(&self, path: &Path) -> Result<PathBuf, LakeError> {
        silver_path_for(path, &self.bronze, &self.silver)
    }

    /// Copy a CSV or Parquet file into today's bronze upload directory as Parquet.
    ///
    /// # Errors
    ///
    /// Propagates load and write failures.
    pub fn ingest(&self, source: &Path) -> Result<IngestedFile, LakeError> {
        self.ingest_on(source, Utc::now().date_naive())
    }

    /// [`Self::ingest`] with an explicit date directory.
    ///
    /// # Errors
    ///
    /// Propagates load and write failures.
    pub fn ingest_on(&self, source: &Path, date: NaiveDate) -> Result<IngestedFile, LakeError> {
        let dataset = self.load(source)?;
        let stem = source
            .file_stem()
            .ok_or_else(|| LakeError::UnsupportedFormat(source.display().to_string()))?;

        let mut dest = self
            .upload_dir()
            .join(date.format("%Y-%m-%d").to_string())
            .join(stem);
        dest.set_extension(DataFormat::Parquet.extension());

        self.write(&dataset, &dest)?;
        tracing::info!(
            source = %source.display(),
            dest = %dest.display(),
            rows = dataset.row_count(),
            "ingested file into bronze tier"
        );

        Ok(IngestedFile {
            columns: dataset.column_names(),
            row_count: dataset.row_count(),
            path: dest,
        })
    }
}

/// Map a bronze-tier path to its silver-tier twin.
///
/// The first path component equal to `bronze` becomes `silver`; the rest of
/// the directory structure is kept and the file gets a `.parquet` extension.
///
/// # Errors
///
/// Returns [`LakeError::OutsideTier`] if no component equals `bronze`.
pub fn silver_path_for(path: &Path, bronze: &str, silver: &str) -> Result<PathBuf, LakeError> {
    let mut replaced = false;
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Normal(seg) if !replaced && seg == bronze => {
                out.push(silver);
                replaced = true;
            }
            other => out.push(other),
        }
    }
    if !replaced {
        return Err(LakeError::OutsideTier {
            path: path.to_path_buf(),
            segment: bronze.to_string(),
        });
    }
    out.set_extension(DataFormat::Parquet.extension());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        "delta-lake/bronze/upload/2026-01-05/sales.csv",
        "delta-lake/silver/upload/2026-01-05/sales.parquet"
    )]
    #[case(
        "/data/bronze/upload/sales.parquet",
        "/data/silver/upload/sales.parquet"
    )]
    #[case("bronze/x.v2.csv", "silver/x.v2.parquet")]
    #[case("lake/bronze/bronze/a.csv", "lake/silver/bronze/a.parquet")]
    fn silver_paths(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(
            silver_path_for(Path::new(input), "bronze", "silver").unwrap(),
            PathBuf::from(expected)
        );
    }

    #[test]
    fn silver_path_requires_bronze_component() {
        let err = silver_path_for(Path::new("lake/bronzed/a.csv"), "bronze", "silver").unwrap_err();
        assert!(matches!(err, LakeError::OutsideTier { .. }));
    }

    #[test]
    fn upload_dir_layout() {
        let store = TabularStore::new("/lake", "raw", "clean");
        assert_eq!(store.upload_dir(), PathBuf::from("/lake/raw/upload"));
        assert_eq!(
            store.silver_path(Path::new("/lake/raw/upload/a.csv")).unwrap(),
            PathBuf::from("/lake/clean/upload/a.parquet")
        );
    }

    #[test]
    fn from_config_uses_segments() {
        let config = LakeConfig::default();
        let store = TabularStore::from_config(&config);
        assert_eq!(store.root(), Path::new("delta-lake"));
        assert_eq!(
            store.upload_dir(),
            PathBuf::from("delta-lake/bronze/upload")
        );
    }
}
