//! Configuration management for inspector-bridge.
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. Command-line arguments
//! 2. Environment variables
//! 3. Configuration file (JSON)
//! 4. Default values

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cli::Args;
use crate::inspector::{InspectorOptions, DEFAULT_CONTEXT_GROUP_ID};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inspector configuration.
    pub inspector: InspectorSection,
    /// Logging configuration.
    pub logging: LoggingSection,
}

/// Inspector configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InspectorSection {
    /// Context group sessions connect to.
    pub context_group_id: i32,
    /// Name announced for the inspected context.
    pub context_name: String,
}

impl Default for InspectorSection {
    fn default() -> Self {
        Self {
            context_group_id: DEFAULT_CONTEXT_GROUP_ID,
            context_name: String::new(),
        }
    }
}

/// Levels that on their own scope to this crate's events.
const LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

const CRATE_TARGET: &str = "inspector_bridge";

/// Logging configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level (error, warn, info, debug, trace) or a full filter directive.
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        serde_json::from_str(&content).map_err(ConfigError::Json)
    }

    /// Apply environment variable overrides.
    pub fn apply_env(&mut self) {
        if let Ok(group) = std::env::var("INSPECTOR_BRIDGE_CONTEXT_GROUP") {
            if let Ok(group) = group.parse() {
                self.inspector.context_group_id = group;
            }
        }

        if let Ok(level) = std::env::var("INSPECTOR_BRIDGE_LOG_LEVEL") {
            self.logging.level = level;
        } else if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
    }

    /// Apply CLI argument overrides.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(group) = args.context_group {
            self.inspector.context_group_id = group;
        }

        if let Some(ref level) = args.log_level {
            self.logging.level = level.clone();
        }
    }

    /// Load configuration with full priority chain.
    ///
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load(args: &Args) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(ref path) = args.config {
            config = Config::from_file(path)?;
        }

        config.apply_env();
        config.apply_args(args);

        Ok(config)
    }

    /// Session options for the inspector module.
    pub fn to_options(&self) -> InspectorOptions {
        InspectorOptions {
            context_group_id: self.inspector.context_group_id,
        }
    }

    /// Filter directive for the subscriber.
    ///
    /// A bare level applies to this crate only. Anything else, such as
    /// `inspector_bridge=debug,warn`, is passed through unchanged.
    pub fn log_filter(&self) -> String {
        let level = self.logging.level.trim();
        if LEVELS.iter().any(|l| l.eq_ignore_ascii_case(level)) {
            format!("{}={}", CRATE_TARGET, level.to_ascii_lowercase())
        } else {
            level.to_string()
        }
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(std::io::Error),
    /// JSON parsing error.
    Json(serde_json::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read config file: {}", e),
            Self::Json(e) => write!(f, "failed to parse config file: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}
