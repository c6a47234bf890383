//! datagen configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main datagen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Where generated samples are written
    pub output: OutputConfig,
}

impl Config {
    /// Load configuration with fallback chain
    ///
    /// `--config PATH` > `./.datagen.yml` > `<config_dir>/datagen/datagen.yml` > defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .datagen.yml
        let local_config = PathBuf::from(".datagen.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/datagen/datagen.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("datagen").join("datagen.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Peek at the configured log level before logging is initialized
    ///
    /// Errors are swallowed here; the full `load` reports them once logging is up.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        Self::load(config_path).ok().and_then(|c| c.log_level)
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Default Gemini REST endpoint
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default OpenAI REST endpoint
pub const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("gemini" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL (provider default when unset)
    #[serde(rename = "base-url")]
    pub base_url: Option<String>,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-2.5-flash".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: None,
            temperature: 0.7,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Resolve the API key through `credentials`
    ///
    /// Returns `None` when the configured variable is unset or blank.
    pub fn resolve(&self, credentials: &dyn CredentialSource) -> Option<ResolvedLlmConfig> {
        debug!(provider = %self.provider, var = %self.api_key_env, "LlmConfig::resolve: called");
        let api_key = credentials
            .lookup(&self.api_key_env)
            .filter(|key| !key.trim().is_empty())?;

        let base_url = self.base_url.clone().unwrap_or_else(|| {
            match self.provider.as_str() {
                "openai" => OPENAI_BASE_URL,
                _ => GEMINI_BASE_URL,
            }
            .to_string()
        });

        Some(ResolvedLlmConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            api_key,
            base_url,
            temperature: self.temperature,
            timeout_ms: self.timeout_ms,
        })
    }

    /// How to obtain a key for the configured provider
    pub fn credential_guidance(&self) -> String {
        let where_to_get = match self.provider.as_str() {
            "openai" => "https://platform.openai.com/api-keys",
            _ => "https://aistudio.google.com/app/apikey",
        };
        format!(
            "Create an API key at {} and export it, e.g. `export {}=<your-key>`",
            where_to_get, self.api_key_env
        )
    }
}

/// LLM configuration with the credential filled in
#[derive(Clone)]
pub struct ResolvedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for saved samples (OS downloads folder when unset)
    pub dir: Option<PathBuf>,
}

/// Where API credentials are looked up
pub trait CredentialSource: Send + Sync {
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Reads credentials from the process environment at lookup time
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvCredentials;

impl CredentialSource for EnvCredentials {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl CredentialSource for HashMap<String, String> {
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}
