//! datagen - sample data from natural-language field descriptions
//!
//! A user lists fields as `(name, description)` pairs; datagen validates them
//! into a [`Schema`], renders a prompt asking a language model for that many
//! records as newline-delimited JSON, and returns the model's text untouched.
//!
//! # Modules
//!
//! - [`schema`] - field validation and the canonical schema string
//! - [`generator`] - request validation and the single model call
//! - [`llm`] - LLM client trait and Gemini/OpenAI implementations
//! - [`prompts`] - the embedded generation prompt
//! - [`fields`] - reading field rows from CLI pairs or files
//! - [`output`] - saving generated samples
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod cli;
pub mod config;
pub mod fields;
pub mod generator;
pub mod llm;
pub mod output;
pub mod prompts;
pub mod schema;

// Re-export commonly used types
pub use config::{Config, CredentialSource, EnvCredentials, LlmConfig};
pub use generator::{ClientFactory, GenerateError, GenerationRequest, MAX_RECORDS, MIN_RECORDS, SampleGenerator};
pub use llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError, create_client};
pub use schema::{FieldDefinition, RawField, Schema, SchemaError, format_fields, format_raw_fields};
