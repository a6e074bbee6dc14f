//! # dna-synth
//!
//! Command synthesis: a step's natural-language description plus the
//! dataset's column names go to a text-generation service, and the reply
//! must be a single `df = ...` command.
//!
//! - [`TextGenerator`] is the seam to the service
//! - [`OpenAiClient`] talks to an OpenAI-compatible `/chat/completions` API
//! - [`RetryingGenerator`] adds bounded backoff for transient failures
//! - [`CommandSynthesizer`] builds the prompt and validates the reply

mod error;
mod generator;
mod http;
mod openai;
mod retry;
mod synthesizer;

pub use error::{SynthError, UpstreamError};
pub use generator::{CompletionRequest, TextGenerator};
pub use openai::OpenAiClient;
pub use retry::{RetryConfig, RetryingGenerator};
pub use synthesizer::{CommandSynthesizer, HEADER_PROMOTION_COMMAND, Synthesis};

use dna_config::LlmConfig;

/// The production generator stack for a configuration.
pub type DefaultGenerator = RetryingGenerator<OpenAiClient>;

/// Build a synthesizer backed by [`OpenAiClient`] with configured retries.
///
/// # Errors
///
/// Returns [`UpstreamError::Setup`] if the HTTP client cannot be built.
pub fn synthesizer_from_config(
    config: &LlmConfig,
) -> Result<CommandSynthesizer<DefaultGenerator>, UpstreamError> {
    let client = OpenAiClient::new(config)?;
    let generator = RetryingGenerator::new(client, RetryConfig::from_llm(config));
    Ok(CommandSynthesizer::new(generator, config))
}
