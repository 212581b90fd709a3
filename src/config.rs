//! Configuration management
//!
//! This module handles loading and managing configuration from:
//! - Command-line arguments
//! - Environment variables
//! - Configuration files (TOML)
//! - Defaults

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub output: OutputConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Field-level rules applied to every order record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Smallest admissible timestamp
    #[serde(default)]
    pub min_timestamp: i64,

    /// Largest admissible quantity
    pub max_quantity: Option<i64>,

    /// Largest admissible cost
    pub max_cost: Option<f64>,

    /// Reject records with an empty description
    #[serde(default = "default_require_description")]
    pub require_description: bool,

    /// Regex the whole order identifier has to match
    pub order_id_pattern: Option<String>,

    /// Regex the whole customer identifier has to match
    pub customer_id_pattern: Option<String>,
}

/// Report output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report format (table, json)
    #[serde(default = "default_format")]
    pub format: String,

    /// Decimal places for monetary totals in the table format
    #[serde(default = "default_precision")]
    pub precision: usize,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default value functions

fn default_require_description() -> bool {
    true
}

fn default_format() -> String {
    "table".to_string()
}

fn default_precision() -> usize {
    2
}

fn default_log_level() -> String {
    "info".to_string()
}

// Default implementations

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_timestamp: 0,
            max_quantity: None,
            max_cost: None,
            require_description: default_require_description(),
            order_id_pattern: None,
            customer_id_pattern: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            precision: default_precision(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let contents = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config file {:?}: {}", path, e)))?;

        Ok(config)
    }

    /// Load configuration from default locations
    ///
    /// Searches in order:
    /// 1. ./tru-state.toml
    /// 2. ~/.tru-state/config.toml
    /// 3. /etc/tru-state/config.toml
    pub fn load() -> Result<Self> {
        let mut paths = vec![PathBuf::from("tru-state.toml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".tru-state").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/tru-state/config.toml"));

        for path in paths {
            if path.exists() {
                tracing::info!("Loading config from {:?}", path);
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Config::default())
    }
}
