//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Unknown LLM provider: '{0}'. Supported: gemini, openai")]
    UnknownProvider(String),

    #[error("Invalid JSON in response: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_message() {
        let err = LlmError::UnknownProvider("acme".to_string());
        assert_eq!(err.to_string(), "Unknown LLM provider: 'acme'. Supported: gemini, openai");
    }

    #[test]
    fn test_json_message_names_the_response() {
        let err: LlmError = serde_json::from_str::<serde_json::Value>("not json").unwrap_err().into();
        assert!(err.to_string().starts_with("Invalid JSON in response: "));
    }
}
