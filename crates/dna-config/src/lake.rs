//! Lake directory layout.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_root() -> String {
    "delta-lake".to_string()
}

fn default_bronze_segment() -> String {
    "bronze".to_string()
}

fn default_silver_segment() -> String {
    "silver".to_string()
}

const fn default_preview_limit() -> usize {
    100
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LakeConfig {
    /// Root directory holding every tier.
    #[serde(default = "default_root")]
    pub root: String,

    /// Path segment naming the raw tier.
    #[serde(default = "default_bronze_segment")]
    pub bronze_segment: String,

    /// Path segment naming the cleaned tier.
    #[serde(default = "default_silver_segment")]
    pub silver_segment: String,

    /// Maximum rows returned by a step preview.
    #[serde(default = "default_preview_limit")]
    pub preview_limit: usize,
}

impl Default for LakeConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            bronze_segment: default_bronze_segment(),
            silver_segment: default_silver_segment(),
            preview_limit: default_preview_limit(),
        }
    }
}

impl LakeConfig {
    #[must_use]
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(&self.root)
    }

    /// `<root>/<bronze>/upload`, where ingested files land.
    #[must_use]
    pub fn upload_dir(&self) -> PathBuf {
        self.root_path().join(&self.bronze_segment).join("upload")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = LakeConfig::default();
        assert_eq!(config.root, "delta-lake");
        assert_eq!(config.bronze_segment, "bronze");
        assert_eq!(config.silver_segment, "silver");
        assert_eq!(config.preview_limit, 100);
        assert_eq!(
            config.upload_dir(),
            PathBuf::from("delta-lake").join("bronze").join("upload")
        );
    }
}
