//! Google Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, FinishReason, LlmClient, LlmError, ResponseFormat, TokenUsage};
use crate::config::ResolvedLlmConfig;

/// Gemini API client
pub struct GeminiClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from resolved configuration
    pub fn from_config(config: &ResolvedLlmConfig) -> Result<Self, LlmError> {
        debug!(?config, "GeminiClient::from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        debug!(%self.model, temperature = %request.temperature, "build_request_body: called");
        let mut generation_config = serde_json::json!({
            "temperature": request.temperature,
        });

        if request.response_format == ResponseFormat::Json {
            generation_config["responseMimeType"] = serde_json::json!("application/json");
        }

        serde_json::json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": request.prompt }],
            }],
            "generationConfig": generation_config,
        })
    }

    /// Parse the Gemini API response
    fn parse_response(&self, api_response: GeminiResponse) -> Result<CompletionResponse, LlmError> {
        let candidate = api_response
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("No candidates in response".to_string()))?;

        let text: String = candidate
            .content
            .and_then(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        let finish_reason = candidate
            .finish_reason
            .as_deref()
            .map(FinishReason::from_gemini)
            .unwrap_or(FinishReason::Stop);

        let usage = api_response
            .usage_metadata
            .map(|u| TokenUsage {
                input_tokens: u.prompt_token_count.unwrap_or(0),
                output_tokens: u.candidates_token_count.unwrap_or(0),
            })
            .unwrap_or_default();

        Ok(CompletionResponse {
            content: if text.is_empty() { None } else { Some(text) },
            finish_reason,
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn model(&self) -> &str {
        &self.model
    }

    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, "complete: called");
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();

        if status == 429 {
            debug!("complete: rate limited (429)");
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            debug!(%status, "complete: API error");
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiError { status, message: text });
        }

        debug!("complete: success");
        let raw = response.text().await?;
        let api_response: GeminiResponse = serde_json::from_str(&raw)?;
        self.parse_response(api_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    parts: Option<Vec<GeminiPart>>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    prompt_token_count: Option<u64>,
    candidates_token_count: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::test_server;

    fn client() -> GeminiClient {
        GeminiClient {
            model: "gemini-2.5-flash".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            http: Client::new(),
        }
    }

    #[test]
    fn test_build_request_body_json() {
        let request = CompletionRequest::new("Generate 3 records", 0.7).json();
        let body = client().build_request_body(&request);

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Generate 3 records");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        let temperature = body["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_build_request_body_text() {
        let body = client().build_request_body(&CompletionRequest::new("hi", 0.0));
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_parse_response_joins_parts() {
        let raw = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "{\"a\": 1}\n"}, {"text": "{\"a\": 2}"}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 8, "totalTokenCount": 20}
        }"#;
        let parsed: GeminiResponse = serde_json::from_str(raw).unwrap();
        let response = client().parse_response(parsed).unwrap();

        assert_eq!(response.content.as_deref(), Some("{\"a\": 1}\n{\"a\": 2}"));
        assert_eq!(response.finish_reason, FinishReason::Stop);
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 8);
    }

    #[test]
    fn test_parse_response_without_candidates() {
        let parsed: GeminiResponse = serde_json::from_str(r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#).unwrap();
        let err = client().parse_response(parsed).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }

    fn local_client(base_url: &str, timeout_ms: u64) -> GeminiClient {
        GeminiClient::from_config(&ResolvedLlmConfig {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key: "test-key".to_string(),
            base_url: format!("{}/", base_url),
            temperature: 0.7,
            timeout_ms,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_complete_over_http() {
        let body = r#"{"candidates": [{"content": {"parts": [{"text": "{\"name\": \"John Doe\"}"}]}, "finishReason": "STOP"}]}"#;
        let (base_url, server) = test_server::respond_once(200, &[], body).await;

        let response = local_client(&base_url, 5_000)
            .complete(CompletionRequest::new("Generate 1 record", 0.7).json())
            .await
            .unwrap();
        assert_eq!(response.content.as_deref(), Some(r#"{"name": "John Doe"}"#));

        let request = server.await.unwrap();
        assert!(request.starts_with("POST /models/gemini-2.5-flash:generateContent "));
        assert!(request.to_lowercase().contains("x-goog-api-key: test-key"));
        assert!(request.contains(r#""responseMimeType":"application/json""#));
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let (base_url, _server) = test_server::respond_once(429, &[("retry-after", "5")], "{}").await;

        let err = local_client(&base_url, 5_000)
            .complete(CompletionRequest::new("hi", 0.7))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::RateLimited { retry_after } if retry_after == Duration::from_secs(5)));
        assert_eq!(err.to_string(), "Rate limited, retry after 5s");
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let (base_url, _server) = test_server::respond_once(500, &[], "boom").await;

        let err = local_client(&base_url, 5_000)
            .complete(CompletionRequest::new("hi", 0.7))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::ApiError { status: 500, ref message } if message == "boom"));
        assert_eq!(err.to_string(), "API error 500: boom");
    }

    #[tokio::test]
    async fn test_complete_malformed_body() {
        let (base_url, _server) = test_server::respond_once(200, &[], "not json at all").await;

        let err = local_client(&base_url, 5_000)
            .complete(CompletionRequest::new("hi", 0.7))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Json(_)));
        assert!(err.to_string().starts_with("Invalid JSON in response"));
    }

    #[tokio::test]
    async fn test_complete_times_out() {
        let base_url = test_server::accept_and_stall().await;

        let err = local_client(&base_url, 200)
            .complete(CompletionRequest::new("hi", 0.7))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::Network(ref e) if e.is_timeout()));
    }
}
