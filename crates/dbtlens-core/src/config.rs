//! Configuration schema (dbtlens.toml)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Report output configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Where to write the JSON overview report (stdout only when unset)
    #[serde(default)]
    pub output: Option<PathBuf>,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// dbt target directory holding manifest.json and run_results.json
    #[serde(default = "default_target_dir")]
    pub target_dir: PathBuf,

    /// Report output settings
    #[serde(default)]
    pub report: ReportConfig,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_target_dir() -> PathBuf {
    PathBuf::from("target")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_dir: default_target_dir(),
            report: ReportConfig::default(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Resolve the target directory against the project root
    pub fn resolved_target_dir(&self) -> PathBuf {
        if self.target_dir.is_absolute() {
            self.target_dir.clone()
        } else {
            self.project_root.join(&self.target_dir)
        }
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
