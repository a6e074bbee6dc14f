use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file or `DNA_*` variable could not be parsed.
    #[error("failed to read dna config: {0}")]
    Figment(#[from] figment::Error),

    /// The `[llm]` section points at a remote endpoint without a key.
    #[error("llm.api_key is not set for {base_url} (set DNA_LLM__API_KEY or [llm] api_key in .dna/config.toml)")]
    MissingApiKey { base_url: String },

    /// A `[lake]` or `[llm]` value the pipeline cannot run with.
    #[error("invalid {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}
