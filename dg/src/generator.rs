//! Sample generation
//!
//! Validates generation parameters, renders the prompt, and makes exactly one
//! model call. All validation happens before a client is even created.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{CredentialSource, EnvCredentials, LlmConfig, ResolvedLlmConfig};
use crate::llm::{self, CompletionRequest, LlmClient, LlmError};
use crate::prompts::{self, SamplePromptContext};
use crate::schema::Schema;

/// Smallest number of records a request may ask for
pub const MIN_RECORDS: u32 = 1;

/// Largest number of records a request may ask for
pub const MAX_RECORDS: u32 = 100;

/// Errors returned by [`SampleGenerator::generate`]
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("{var} not found. {guidance}")]
    MissingCredential { var: String, guidance: String },

    #[error("Number of records must be between {} and {}, got {count}", MIN_RECORDS, MAX_RECORDS)]
    InvalidRecordCount { count: u32 },

    #[error("Schema cannot be empty")]
    EmptySchema,

    #[error("Failed to render prompt: {0}")]
    PromptRender(#[from] handlebars::RenderError),

    #[error("Failed to generate sample data: {0}")]
    GenerationFailed(#[source] LlmError),
}

/// A validated generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    record_count: u32,
    schema: &'a str,
}

impl<'a> GenerationRequest<'a> {
    /// Check the record count, then the schema
    pub fn new(record_count: u32, schema: &'a str) -> Result<Self, GenerateError> {
        if !(MIN_RECORDS..=MAX_RECORDS).contains(&record_count) {
            return Err(GenerateError::InvalidRecordCount { count: record_count });
        }
        if schema.trim().is_empty() {
            return Err(GenerateError::EmptySchema);
        }
        Ok(Self { record_count, schema })
    }

    pub fn record_count(&self) -> u32 {
        self.record_count
    }

    pub fn schema(&self) -> &str {
        self.schema
    }

    /// Render the natural-language prompt for this request
    pub fn prompt(&self) -> Result<String, GenerateError> {
        let prompt = prompts::render_sample_prompt(&SamplePromptContext {
            record_count: self.record_count,
            schema: self.schema,
        })?;
        Ok(prompt)
    }
}

/// Builds an LLM client once the configuration has been resolved
pub trait ClientFactory: Send + Sync {
    fn create(&self, config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, LlmError>;
}

impl<F> ClientFactory for F
where
    F: Fn(&ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> + Send + Sync,
{
    fn create(&self, config: &ResolvedLlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
        self(config)
    }
}

/// Turns a formatted schema into model-generated sample records
pub struct SampleGenerator {
    config: LlmConfig,
    credentials: Box<dyn CredentialSource>,
    factory: Box<dyn ClientFactory>,
}

impl SampleGenerator {
    /// Create a generator using the provider clients from [`llm::create_client`]
    pub fn new(config: LlmConfig, credentials: impl CredentialSource + 'static) -> Self {
        debug!(provider = %config.provider, model = %config.model, "SampleGenerator::new: called");
        Self {
            config,
            credentials: Box::new(credentials),
            factory: Box::new(llm::create_client),
        }
    }

    /// Create a generator that reads the API key from the process environment
    pub fn from_env(config: LlmConfig) -> Self {
        Self::new(config, EnvCredentials)
    }

    /// Replace how the model client is built
    pub fn with_client_factory(mut self, factory: impl ClientFactory + 'static) -> Self {
        self.factory = Box::new(factory);
        self
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generate `record_count` sample records for `formatted_schema`
    ///
    /// Checks, in order: credential present, count in range, schema non-blank.
    /// On success returns the model output unmodified.
    pub async fn generate(&self, record_count: u32, formatted_schema: &str) -> Result<String, GenerateError> {
        debug!(%record_count, schema_len = formatted_schema.len(), "generate: called");

        let resolved = self
            .config
            .resolve(self.credentials.as_ref())
            .ok_or_else(|| GenerateError::MissingCredential {
                var: self.config.api_key_env.clone(),
                guidance: self.config.credential_guidance(),
            })?;

        let request = GenerationRequest::new(record_count, formatted_schema)?;
        let prompt = request.prompt()?;

        let completion = CompletionRequest::new(prompt, resolved.temperature).json();

        info!(
            "Requesting {} sample records from {}/{}",
            record_count, resolved.provider, resolved.model
        );

        let response = match self.factory.create(&resolved) {
            Ok(client) => client.complete(completion).await,
            Err(e) => Err(e),
        };

        match response {
            Ok(response) => {
                debug!(
                    finish_reason = ?response.finish_reason,
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    "generate: model call succeeded"
                );
                Ok(response.content.unwrap_or_default())
            }
            Err(e) => {
                info!(error = %e, "generate: model call failed");
                Err(GenerateError::GenerationFailed(e))
            }
        }
    }

    /// Generate records for an already formatted [`Schema`]
    pub async fn generate_for(&self, record_count: u32, schema: &Schema) -> Result<String, GenerateError> {
        self.generate(record_count, &schema.to_string()).await
    }
}
