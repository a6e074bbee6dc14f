//! Synthesis error types.

use thiserror::Error;

/// Failures talking to the text-generation service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 401: the bearer token was refused.
    #[error("authentication failed")]
    AuthFailed,

    /// 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// The response body did not carry a completion.
    #[error("parse error: {0}")]
    Parse(String),

    /// The client could not be constructed.
    #[error("client setup failed: {0}")]
    Setup(String),
}

impl UpstreamError {
    /// Whether a retry could plausibly succeed.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::Api { status, .. } => *status >= 500,
            Self::RateLimited { .. } => true,
            Self::AuthFailed | Self::Parse(_) | Self::Setup(_) => false,
        }
    }
}

/// Errors from turning a description into a command.
#[derive(Debug, Error)]
pub enum SynthError {
    /// The generated text is not a command. Carries the text for inspection.
    #[error("generated text is not a valid command: {command:?}")]
    Rejected { command: String },

    #[error("text generation failed: {0}")]
    Upstream(#[from] UpstreamError),
}
