//! The text-generation seam.

use std::future::Future;

use serde::{Deserialize, Serialize};

use crate::error::UpstreamError;

/// One prompt/response exchange with the service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Anything that can turn a [`CompletionRequest`] into text.
///
/// Implemented by [`crate::OpenAiClient`] for real traffic, by
/// [`crate::RetryingGenerator`] as a wrapper, and by scripted stubs in tests.
pub trait TextGenerator: Send + Sync {
    /// Produce the raw completion text.
    fn generate(
        &self,
        request: &CompletionRequest,
    ) -> impl Future<Output = Result<String, UpstreamError>> + Send;
}
