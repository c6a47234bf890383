//! LLM Client module
//!
//! Provides single-shot completion requests against a configured provider.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod error;
mod gemini;
mod openai;
#[cfg(test)]
pub(crate) mod test_server;
mod types;

pub use client::LlmClient;
pub use error::LlmError;
pub use gemini::GeminiClient;
pub use openai::OpenAIClient;
pub use types::{CompletionRequest, CompletionResponse, FinishReason, ResponseFormat, TokenUsage};

use crate::config::ResolvedLlmConfig;

/// Create an LLM client from a resolved configuration
///
/// Supports "gemini" and "openai" providers.
pub fn create_client(config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "gemini" => {
            debug!("create_client: creating Gemini client");
            Ok(Arc::new(GeminiClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::UnknownProvider(other.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(provider: &str) -> ResolvedLlmConfig {
        ResolvedLlmConfig {
            provider: provider.to_string(),
            model: "some-model".to_string(),
            api_key: "key".to_string(),
            base_url: "http://localhost:9".to_string(),
            temperature: 0.7,
            timeout_ms: 1_000,
        }
    }

    #[test]
    fn test_create_client_known_providers() {
        let gemini = create_client(&resolved("gemini")).unwrap();
        assert_eq!(gemini.model(), "some-model");
        assert!(create_client(&resolved("openai")).is_ok());
    }

    #[test]
    fn test_create_client_unknown_provider() {
        let err = create_client(&resolved("acme")).err().unwrap();
        assert!(matches!(err, LlmError::UnknownProvider(ref p) if p == "acme"));
    }
}
