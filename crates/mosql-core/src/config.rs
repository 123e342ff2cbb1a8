//! Configuration schema (mosql.toml)
//!
//! Every section is optional. Values from the environment (`MO_TMPDIR`,
//! `MO_GNUPLOT`, `MO_LLM_MODEL`, `OLLAMA_HOST`, `DATABASE_URL`) take
//! precedence over the file once [`Config::with_env_overrides`] is applied.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Temp directory override for plot workspaces
pub const ENV_TMPDIR: &str = "MO_TMPDIR";

/// Plot executable override
pub const ENV_GNUPLOT: &str = "MO_GNUPLOT";

/// Model name override for text-to-SQL
pub const ENV_LLM_MODEL: &str = "MO_LLM_MODEL";

/// Ollama endpoint override
pub const ENV_OLLAMA_HOST: &str = "OLLAMA_HOST";

/// Database connection string override
pub const ENV_DATABASE_URL: &str = "DATABASE_URL";

/// Plot pipeline settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Directory under which per-plot workspaces are created
    pub tmp_dir: PathBuf,

    /// Plot executable (looked up on PATH when not absolute)
    pub gnuplot: PathBuf,

    /// SVG canvas width in pixels
    pub width: u32,

    /// SVG canvas height in pixels
    pub height: u32,

    /// Default `set boxwidth` value
    pub box_width: f64,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            tmp_dir: PathBuf::from("/tmp"),
            gnuplot: PathBuf::from("gnuplot"),
            width: 800,
            height: 600,
            box_width: 0.5,
        }
    }
}

/// Language model settings for text-to-SQL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model name passed to the backend
    pub model: String,

    /// Ollama endpoint
    pub host: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Request timeout in seconds (0 disables the timeout)
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "llama3.1".to_string(),
            host: "http://127.0.0.1:11434".to_string(),
            temperature: 0.1,
            timeout_secs: 120,
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string
    pub url: Option<String>,

    /// Connect with TLS
    pub tls: bool,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Plot pipeline settings
    #[serde(default)]
    pub plot: PlotConfig,

    /// Text-to-SQL model settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Database connection settings
    #[serde(default)]
    pub database: DatabaseConfig,
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;

        Self::from_toml(&contents)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// Empty values are treated as unset.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_TMPDIR) {
            self.plot.tmp_dir = PathBuf::from(dir);
        }
        if let Some(exe) = get(ENV_GNUPLOT) {
            self.plot.gnuplot = PathBuf::from(exe);
        }
        if let Some(model) = get(ENV_LLM_MODEL) {
            self.llm.model = model;
        }
        if let Some(host) = get(ENV_OLLAMA_HOST) {
            self.llm.host = host;
        }
        if let Some(url) = get(ENV_DATABASE_URL) {
            self.database.url = Some(url);
        }

        self
    }
}

/// Config error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),
}
