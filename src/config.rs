//! Configuration management for CallSum
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.
//! Layers are applied in that order: defaults, file, environment, flags.

use crate::error::{CallsumError, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for CallSum
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,
    /// Chat panel behavior
    #[serde(default)]
    pub chat: ChatConfig,
    /// Where the signed-in session is persisted between runs
    #[serde(default)]
    pub session: SessionConfig,
}

/// Backend API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the summarization backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds
    ///
    /// Summarization of long recordings is slow, so this is generous.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Number of conversations requested when the chat list is refreshed
    #[serde(default = "default_history_limit")]
    pub history_limit: u32,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout_seconds() -> u64 {
    300
}

fn default_history_limit() -> u32 {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
            history_limit: default_history_limit(),
        }
    }
}

/// How the chat panel produces the assistant's turn
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantMode {
    /// Fixed placeholder text appended after `reply_delay_ms`
    #[default]
    Placeholder,
    /// Ask the backend chatbot via `/chat/query`
    Backend,
}

impl std::str::FromStr for AssistantMode {
    type Err = CallsumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "placeholder" => Ok(AssistantMode::Placeholder),
            "backend" => Ok(AssistantMode::Backend),
            other => Err(CallsumError::Config(format!(
                "Invalid assistant mode: {}. Must be one of: placeholder, backend",
                other
            ))),
        }
    }
}

/// Chat panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Delay before the placeholder reply is appended, in milliseconds
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,

    /// Assistant reply strategy
    #[serde(default)]
    pub assistant: AssistantMode,

    /// LLM requested from the backend chatbot: "gemini" or "groq"
    #[serde(default = "default_model_choice")]
    pub model_choice: String,
}

fn default_reply_delay_ms() -> u64 {
    500
}

fn default_model_choice() -> String {
    "gemini".to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            assistant: AssistantMode::default(),
            model_choice: default_model_choice(),
        }
    }
}

/// Backing store for the persisted session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStoreKind {
    /// OS native credential store
    #[default]
    Keyring,
    /// Plain JSON file (useful for tests and headless machines)
    File,
}

/// Session persistence configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Which store to use
    #[serde(default)]
    pub store: SessionStoreKind,

    /// Session file location when `store` is `file`
    ///
    /// Defaults to `session.json` in the platform data directory.
    #[serde(default)]
    pub file_path: Option<PathBuf>,
}

impl Config {
    /// Returns the default configuration file location
    ///
    /// This is `config.yaml` inside the platform configuration directory
    /// (for example `~/.config/callsum/config.yaml` on Linux). Falls back to
    /// `config/config.yaml` relative to the working directory when no home
    /// directory can be determined.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "callsum", "callsum")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .unwrap_or_else(|| PathBuf::from("config/config.yaml"))
    }

    /// Load configuration from file with environment and CLI overrides
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML configuration file
    /// * `cli` - Parsed command-line arguments
    ///
    /// # Returns
    ///
    /// Returns the merged configuration. A missing file is not an error:
    /// defaults are used and a warning is logged.
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Config` if the file exists but cannot be read
    /// or parsed.
    pub fn load(path: &Path, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if path.exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path.display());
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CallsumError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| CallsumError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(base_url) = std::env::var("CALLSUM_API_BASE_URL") {
            if !base_url.trim().is_empty() {
                self.api.base_url = base_url;
            }
        }

        if let Ok(timeout) = std::env::var("CALLSUM_TIMEOUT_SECONDS") {
            if let Ok(value) = timeout.parse() {
                self.api.timeout_seconds = value;
            } else {
                tracing::warn!("Invalid CALLSUM_TIMEOUT_SECONDS: {}", timeout);
            }
        }

        if let Ok(delay) = std::env::var("CALLSUM_CHAT_REPLY_DELAY_MS") {
            if let Ok(value) = delay.parse() {
                self.chat.reply_delay_ms = value;
            } else {
                tracing::warn!("Invalid CALLSUM_CHAT_REPLY_DELAY_MS: {}", delay);
            }
        }

        if let Ok(mode) = std::env::var("CALLSUM_CHAT_ASSISTANT") {
            match mode.parse() {
                Ok(value) => self.chat.assistant = value,
                Err(_) => tracing::warn!("Invalid assistant mode: {}, keeping current", mode),
            }
        }

        if let Ok(store) = std::env::var("CALLSUM_SESSION_STORE") {
            self.session.store = match store.to_lowercase().as_str() {
                "keyring" => SessionStoreKind::Keyring,
                "file" => SessionStoreKind::File,
                _ => {
                    tracing::warn!("Invalid session store: {}, using default", store);
                    SessionStoreKind::default()
                }
            };
        }

        if let Ok(file) = std::env::var("CALLSUM_SESSION_FILE") {
            if !file.trim().is_empty() {
                self.session.store = SessionStoreKind::File;
                self.session.file_path = Some(PathBuf::from(file));
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(base_url) = &cli.base_url {
            self.api.base_url = base_url.clone();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `CallsumError::Config` describing the first invalid setting.
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.api.base_url).map_err(|e| {
            CallsumError::Config(format!("Invalid api.base_url '{}': {}", self.api.base_url, e))
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CallsumError::Config(format!(
                "api.base_url must use http or https, got: {}",
                url.scheme()
            ))
            .into());
        }

        if self.api.timeout_seconds == 0 {
            return Err(CallsumError::Config(
                "api.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.api.history_limit == 0 {
            return Err(
                CallsumError::Config("api.history_limit must be greater than 0".to_string())
                    .into(),
            );
        }

        if self.api.history_limit > 1000 {
            return Err(CallsumError::Config(
                "api.history_limit must be less than or equal to 1000".to_string(),
            )
            .into());
        }

        let valid_models = ["gemini", "groq"];
        if !valid_models.contains(&self.chat.model_choice.as_str()) {
            return Err(CallsumError::Config(format!(
                "Invalid chat.model_choice: {}. Must be one of: {}",
                self.chat.model_choice,
                valid_models.join(", ")
            ))
            .into());
        }

        Ok(())
    }

    /// Resolves the session file path, falling back to the data directory
    pub fn session_file_path(&self) -> PathBuf {
        if let Some(path) = &self.session.file_path {
            return path.clone();
        }
        ProjectDirs::from("com", "callsum", "callsum")
            .map(|dirs| dirs.data_dir().join("session.json"))
            .unwrap_or_else(|| PathBuf::from("session.json"))
    }
}
