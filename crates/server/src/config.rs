//! # Application Configuration
//!
//! This module defines the configuration structure for the `vertagger-server`
//! and the logic for loading it from a `config.yml` file and environment
//! variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use tracing::info;
use vertagger::{
    constants::{DEFAULT_MODEL, DEFAULT_OPENAI_API_URL},
    PromptSource,
};

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates a required configuration file was not found.
    NotFound(String),
    /// A required key is absent or empty after all layers are merged.
    Missing(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
            ConfigError::Missing(key) => {
                write!(f, "Required configuration key '{key}' is missing or empty")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The key clients must send in the `X-API-Key` header.
    #[serde(default)]
    pub api_key: String,
    pub openai: OpenAiConfig,
    pub prompts: PromptSource,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
}

fn default_port() -> u16 {
    8000
}

/// Connection settings for the chat-completions endpoint.
#[derive(Debug, Deserialize, Clone)]
pub struct OpenAiConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_model_name")]
    pub model_name: String,
    #[serde(default)]
    pub temperature: f32,
}

fn default_api_url() -> String {
    DEFAULT_OPENAI_API_URL.to_string()
}

fn default_model_name() -> String {
    DEFAULT_MODEL.to_string()
}

/// The score collector. Without an endpoint, scores are only logged.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct TelemetryConfig {
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub workspace: Option<String>,
    #[serde(default)]
    pub project_name: Option<String>,
}

impl TelemetryConfig {
    /// The collector endpoint, if one is configured with a non-empty value.
    pub fn endpoint(&self) -> Option<&str> {
        non_empty(self.endpoint.as_deref())
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ValidationConfig {
    /// Reject responses with values outside the allowed `userneeds` and
    /// `audiences` instead of only scoring them.
    #[serde(default)]
    pub strict_enums: bool,
}

impl AppConfig {
    /// Checks that every required key carries a value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("api_key"));
        }
        if self.openai.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("openai.api_key"));
        }
        if self.openai.api_url.trim().is_empty() {
            return Err(ConfigError::Missing("openai.api_url"));
        }
        if self.prompts.path().as_os_str().is_empty() {
            return Err(ConfigError::Missing("prompts.path"));
        }
        Ok(())
    }
}

/// Treats an empty string left behind by `${VAR}` substitution as unset.
pub(crate) fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let re = Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}")
        .map_err(|e| ConfigError::General(e.to_string()))?;
    let expanded_content = re.replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// - `${VAR}` placeholders in the file are replaced with environment values.
/// - Top-level keys like `port` and `api_key` are overridden by `PORT` and `API_KEY`.
/// - Nested keys are overridden by `VERTAGGER_...` variables (e.g., `VERTAGGER_OPENAI__MODEL_NAME`).
///
/// The result is validated before it is returned.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let base_path = env!("CARGO_MANIFEST_DIR");
    let config_path = match config_path_override {
        Some(override_path) => override_path.to_string(),
        None => format!("{base_path}/config.yml"),
    };

    let content = read_and_substitute(&config_path)?.ok_or_else(|| {
        ConfigError::NotFound(format!("Config file not found at '{config_path}'."))
    })?;
    info!("Loading configuration from '{config_path}'.");

    let settings = ConfigBuilder::builder()
        .add_source(File::from_str(&content, FileFormat::Yaml))
        // Unprefixed environment variables for top-level keys like PORT.
        .add_source(Environment::default())
        // Prefixed environment variables for nested overrides.
        .add_source(
            Environment::with_prefix("VERTAGGER")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;
    config.validate()?;

    // Relative prompt paths are resolved against the config file's directory.
    if let Some(config_dir) = Path::new(&config_path).parent() {
        config.prompts = resolve_prompt_path(config.prompts, config_dir);
    }
    Ok(config)
}

fn resolve_prompt_path(source: PromptSource, base: &Path) -> PromptSource {
    match source {
        PromptSource::Directory { path, fragments } if path.is_relative() => {
            PromptSource::Directory {
                path: base.join(path),
                fragments,
            }
        }
        PromptSource::Document { path, fragments } if path.is_relative() => {
            PromptSource::Document {
                path: base.join(path),
                fragments,
            }
        }
        absolute => absolute,
    }
}
