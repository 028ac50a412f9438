//! Configuration management for quill
//!
//! Loads and saves agent settings from a JSON file under `~/.quill/`.
//! Every field has a serde default so a partial (or missing) config
//! file still produces a usable configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

pub mod paths;

pub use paths::{config_path, data_dir, ensure_dir, history_path, sandbox_path};

/// Errors in configuration handling
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config not found: {0}")]
    NotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Model endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    #[serde(default = "default_model")]
    pub model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
        }
    }
}

fn default_api_base() -> String {
    "http://localhost:1234/v1".to_string()
}

fn default_model() -> String {
    "qwen/qwen3-8b".to_string()
}

/// Agent runtime limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentDefaults {
    /// Sandbox root; empty means the default under ~/.quill
    #[serde(default)]
    pub sandbox_root: String,
    /// File reads are truncated past this many characters
    #[serde(default = "default_max_read_chars")]
    pub max_read_chars: usize,
    /// Model round-trips per run before the loop aborts
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
    /// Hard wall-clock ceiling for script execution
    #[serde(default = "default_script_timeout_secs")]
    pub script_timeout_secs: u64,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            sandbox_root: String::new(),
            max_read_chars: default_max_read_chars(),
            max_iterations: default_max_iterations(),
            script_timeout_secs: default_script_timeout_secs(),
        }
    }
}

fn default_max_read_chars() -> usize {
    10_000
}

fn default_max_iterations() -> u32 {
    20
}

fn default_script_timeout_secs() -> u64 {
    30
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub agent: AgentDefaults,
}

impl Config {
    /// Load configuration from the default location
    pub async fn load() -> Result<Self> {
        let path = config_path();
        Self::load_from(&path).await
    }

    /// Load from a specific location; a missing file yields defaults
    pub async fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            info!("no config at {:?}, using defaults", path);
            return Ok(Config::default());
        }

        debug!("loading config from {:?}", path);
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let path = config_path();
        self.save_to(&path).await
    }

    /// Save to a specific location
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        debug!("saved config to {:?}", path);
        Ok(())
    }

    /// Resolve the sandbox root, falling back to the default workspace
    pub fn sandbox_root(&self) -> PathBuf {
        if self.agent.sandbox_root.is_empty() {
            sandbox_path()
        } else {
            PathBuf::from(&self.agent.sandbox_root)
        }
    }
}
