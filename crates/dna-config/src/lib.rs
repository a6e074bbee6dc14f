//! # dna-config
//!
//! Layered configuration loading using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`DNA_*` prefix, `__` as separator)
//! 2. Project-level `.dna/config.toml`
//! 3. User-level `~/.config/dna/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `DNA_LLM__API_KEY` -> `llm.api_key`, `DNA_LAKE__ROOT` -> `lake.root`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use dna_config::DnaConfig;
//!
//! let config = DnaConfig::load_with_dotenv().expect("config");
//!
//! if config.llm.is_configured() {
//!     println!("model: {}", config.llm.model);
//! }
//! ```

mod database;
mod error;
mod lake;
mod llm;

pub use database::DatabaseConfig;
pub use error::ConfigError;
pub use lake::LakeConfig;
pub use llm::LlmConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DnaConfig {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub lake: LakeConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl DnaConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] for `.env` loading.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if extraction fails or a value is invalid.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment directly or add providers on top.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(".dna/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        figment.merge(Env::prefixed("DNA_").split("__"))
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero preview limit, empty or
    /// identical tier segments, or zero synthesis attempts.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lake.preview_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "lake.preview_limit",
                reason: "must be at least 1".into(),
            });
        }
        if self.lake.bronze_segment.is_empty() || self.lake.silver_segment.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "lake.bronze_segment",
                reason: "tier segments must not be empty".into(),
            });
        }
        if self.lake.bronze_segment == self.lake.silver_segment {
            return Err(ConfigError::InvalidValue {
                field: "lake.silver_segment",
                reason: format!(
                    "must differ from bronze segment '{}'",
                    self.lake.bronze_segment
                ),
            });
        }
        if self.llm.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "llm.max_attempts",
                reason: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Fail unless the text-generation service has credentials.
    ///
    /// Local endpoints (Ollama, vLLM) need no key.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingApiKey`] for a remote endpoint with no key.
    pub fn require_llm(&self) -> Result<&LlmConfig, ConfigError> {
        if self.llm.is_configured() || self.llm.is_local() {
            Ok(&self.llm)
        } else {
            Err(ConfigError::MissingApiKey {
                base_url: self.llm.base_url.clone(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dna").join("config.toml"))
    }
}
