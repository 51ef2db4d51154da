//! Configuration management for Locus.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. All config structs implement `Default`.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Locus.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Tag extraction settings
    pub tagging: TaggingConfig,

    /// Category classification settings
    pub classifier: ClassifierConfig,

    /// Retry settings for the classification stage
    pub pipeline: PipelineConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// LLM provider settings
    pub llm: LlmConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Analysis history settings
    pub history: HistoryConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.locus.locus/config.toml
    /// - Linux: ~/.config/locus/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\locus\config\config.toml
    ///
    /// Falls back to ~/.locus/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "locus", "locus")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".locus").join("config.toml")
            })
    }

    /// Get the resolved model directory path (with ~ expansion).
    pub fn model_dir(&self) -> PathBuf {
        expand_path(&self.general.model_dir.to_string_lossy())
    }

    /// Get the resolved history file path (with ~ expansion).
    pub fn history_path(&self) -> PathBuf {
        expand_path(&self.history.path)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}
