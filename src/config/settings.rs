use anyhow::Result;
use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;

use crate::memory::DEFAULT_WINDOW_SIZE;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub memory: MemoryConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the conversation history lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    /// Remote memory API reached with JSON POSTs
    Http {
        url: String,
        #[serde(default)]
        api_key: Option<String>,
    },
    /// Sub-workflow / sub-process invoked per operation
    Workflow { target: String },
    /// Process-local, lost on exit
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryConfig {
    pub backend: BackendConfig,
    #[serde(default)]
    pub session_id: String,
    #[serde(default = "default_context_window_length")]
    pub context_window_length: i64,
    #[serde(default = "default_memory_key")]
    pub memory_key: String,
    #[serde(default = "default_input_key")]
    pub input_key: String,
    #[serde(default = "default_output_key")]
    pub output_key: String,
    #[serde(default = "default_return_messages")]
    pub return_messages: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

fn default_context_window_length() -> i64 {
    DEFAULT_WINDOW_SIZE as i64
}

fn default_memory_key() -> String {
    "chat_history".to_string()
}

fn default_input_key() -> String {
    "input".to_string()
}

fn default_output_key() -> String {
    "output".to_string()
}

fn default_return_messages() -> bool {
    true
}

impl MemoryConfig {
    pub fn new(backend: BackendConfig, session_id: impl Into<String>) -> Self {
        Self {
            backend,
            session_id: session_id.into(),
            context_window_length: default_context_window_length(),
            memory_key: default_memory_key(),
            input_key: default_input_key(),
            output_key: default_output_key(),
            return_messages: default_return_messages(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let config_env = env::var("CONFIG_ENV").unwrap_or_else(|_| "default".to_string());

        let config = Config::builder()
            .add_source(File::with_name(&format!("config/{}", config_env)).required(false))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?;

        config.try_deserialize()
    }

    /// Bearer credential from the environment, if set and non-empty
    pub fn api_key() -> Option<String> {
        env::var("MEMORY_API_KEY").ok().filter(|k| !k.is_empty())
    }
}
