//! Bounded retry for transient text-generation failures.
//!
//! Retries only errors where [`UpstreamError::is_transient`] holds (429,
//! 5xx, timeouts, connection failures) with capped exponential backoff. A
//! rate-limit `Retry-After` is honoured when it is shorter than the cap.

use std::time::Duration;

use dna_config::LlmConfig;

use crate::error::UpstreamError;
use crate::generator::{CompletionRequest, TextGenerator};

#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    /// A single attempt.
    fn default() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(8),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn from_llm(config: &LlmConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            ..Self::default()
        }
    }
}

/// Wraps a generator with [`RetryConfig`]-driven retries.
#[derive(Debug, Clone)]
pub struct RetryingGenerator<G> {
    inner: G,
    config: RetryConfig,
}

impl<G: TextGenerator> RetryingGenerator<G> {
    pub const fn new(inner: G, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    pub const fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: TextGenerator> TextGenerator for RetryingGenerator<G> {
    async fn generate(&self, request: &CompletionRequest) -> Result<String, UpstreamError> {
        let mut delay = self.config.base_delay;
        let mut attempt = 1;
        loop {
            match self.inner.generate(request).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt < self.config.max_attempts => {
                    let wait = match &e {
                        UpstreamError::RateLimited { retry_after_secs } => {
                            Duration::from_secs(*retry_after_secs).min(self.config.max_delay)
                        }
                        _ => delay,
                    };
                    tracing::warn!(
                        attempt,
                        max_attempts = self.config.max_attempts,
                        ?wait,
                        error = %e,
                        "transient text-generation failure, retrying"
                    );
                    tokio::time::sleep(wait).await;
                    delay = (delay * 2).min(self.config.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
