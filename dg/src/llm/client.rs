//! LlmClient trait definition

use async_trait::async_trait;

use super::{CompletionRequest, CompletionResponse, LlmError};

/// Stateless LLM client - each call is independent
///
/// One prompt in, one text response out. Implementations must not retry or
/// stream; a failed call is reported once and left to the caller.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Model identifier this client sends requests to
    fn model(&self) -> &str;

    /// Send a single completion request (blocking until complete)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;
}
