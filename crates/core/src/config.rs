//! Configuration management for the Draftsmith pipeline.
//!
//! This module handles loading and merging configuration from multiple
//! sources:
//! - Built-in defaults
//! - Config files (draftsmith.yaml)
//! - Environment variables
//! - Command-line flags
//!
//! Later sources override earlier ones, matching CLI precedence rules.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Default request timeout for external providers, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of attempts for retryable provider calls.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Main application configuration.
///
/// This struct holds all global configuration options that affect
/// pipeline behavior across commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Optional config file path
    pub config_file: Option<PathBuf>,

    /// Completion provider (e.g., "openai", "mock")
    pub provider: String,

    /// Default completion model identifier
    pub model: String,

    /// Default sampling temperature for completions
    pub temperature: f32,

    /// Environment variable holding the completion/embedding API key
    pub api_key_env: String,

    /// Optional custom endpoint for the completion provider
    pub endpoint: Option<String>,

    /// Embedding provider settings
    pub embedding: EmbeddingSettings,

    /// Vector index settings; `None` disables retrieval entirely
    pub index: Option<IndexSettings>,

    /// Number of attempts for retryable provider calls
    pub max_retries: u32,

    /// Per-request deadline for external calls, in seconds
    pub timeout_secs: u64,

    /// Log level override
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    pub verbose: bool,

    /// Disable colored output
    pub no_color: bool,
}

/// Embedding provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// Embedding provider (e.g., "openai", "mock")
    pub provider: String,

    /// Embedding model identifier
    pub model: String,

    /// Expected embedding dimensionality
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Vector index configuration.
///
/// The index is a remote service with its own lifecycle; the pipeline only
/// needs a host to query and the name of the env var holding its API key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSettings {
    /// Base URL of the index host
    pub host: String,

    /// Environment variable holding the index API key
    #[serde(rename = "apiKeyEnv")]
    pub api_key_env: String,
}

/// Full configuration file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ConfigFile {
    llm: Option<LlmSection>,
    embedding: Option<EmbeddingSettings>,
    index: Option<IndexSettings>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LlmSection {
    provider: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    endpoint: Option<String>,
    #[serde(rename = "apiKeyEnv")]
    api_key_env: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_file: None,
            provider: "openai".to_string(),
            model: "gpt-4o".to_string(),
            temperature: 0.7,
            api_key_env: "OPENAI_API_KEY".to_string(),
            endpoint: None,
            embedding: EmbeddingSettings::default(),
            index: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from defaults, config file, and environment.
    ///
    /// Environment variables:
    /// - `DRAFTSMITH_CONFIG`: Path to config file
    /// - `DRAFTSMITH_PROVIDER`: Completion provider
    /// - `DRAFTSMITH_MODEL`: Model identifier
    /// - `DRAFTSMITH_INDEX_HOST`: Vector index host URL
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("DRAFTSMITH_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("draftsmith.yaml"));

        if config_path.exists() {
            config = config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(provider) = std::env::var("DRAFTSMITH_PROVIDER") {
            config.provider = provider;
        }

        if let Ok(model) = std::env::var("DRAFTSMITH_MODEL") {
            config.model = model;
        }

        if let Ok(host) = std::env::var("DRAFTSMITH_INDEX_HOST") {
            let api_key_env = config
                .index
                .as_ref()
                .map(|i| i.api_key_env.clone())
                .unwrap_or_else(|| "PINECONE_API_KEY".to_string());
            config.index = Some(IndexSettings { host, api_key_env });
        }

        config.log_level = std::env::var("RUST_LOG").ok().or(config.log_level);

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        let mut result = self.clone();

        if let Some(llm) = config_file.llm {
            if let Some(provider) = llm.provider {
                result.provider = provider;
            }
            if let Some(model) = llm.model {
                result.model = model;
            }
            if let Some(temperature) = llm.temperature {
                result.temperature = temperature;
            }
            if let Some(endpoint) = llm.endpoint {
                result.endpoint = Some(endpoint);
            }
            if let Some(api_key_env) = llm.api_key_env {
                result.api_key_env = api_key_env;
            }
        }

        if let Some(embedding) = config_file.embedding {
            result.embedding = embedding;
        }

        if let Some(index) = config_file.index {
            result.index = Some(index);
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                result.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                result.no_color = !color;
            }
        }

        Ok(result)
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// This method merges command-line flags with the loaded configuration,
    /// giving precedence to CLI flags over environment variables.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        provider: Option<String>,
        model: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(provider) = provider {
            self.provider = provider;
        }

        if let Some(model) = model {
            self.model = model;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            // Verbose mode implies debug logging
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Resolve the completion/embedding API key from the configured env var.
    ///
    /// Returns `None` when the variable is unset; providers that require a
    /// key report the missing variable themselves.
    pub fn resolve_api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env).ok()
    }

    /// Resolve the vector index API key, if an index is configured.
    pub fn resolve_index_api_key(&self) -> AppResult<Option<String>> {
        match &self.index {
            Some(index) => std::env::var(&index.api_key_env)
                .map(Some)
                .map_err(|_| {
                    AppError::Config(format!(
                        "Index API key env var '{}' is not set",
                        index.api_key_env
                    ))
                }),
            None => Ok(None),
        }
    }
}
