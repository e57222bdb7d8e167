//! Configuration for the phs-validate binary
//!
//! Sources, highest priority first:
//! 1. Command-line flags (applied by the caller)
//! 2. Environment variables
//! 3. Configuration file
//! 4. Built-in defaults

use anyhow::{Context, Result};
use clap::ValueEnum;
use log::{debug, info};
use phs_validate::ValidatorOptions;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV: &str = "PHS_VALIDATE_CONFIG";
pub const EXPAND_ENV: &str = "PHS_VALIDATE_EXPAND";
pub const PRETTY_ENV: &str = "PHS_VALIDATE_PRETTY";
pub const LOG_LEVEL_ENV: &str = "PHS_VALIDATE_LOG_LEVEL";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PhsConfig {
    /// Validator behaviour
    #[serde(default)]
    pub validator: ValidatorOptions,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Unset leaves the filter to `RUST_LOG`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<LogLevel>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" | "warning" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load the configuration file (explicit path first) and apply
    /// environment overrides
    pub fn load(explicit: Option<&Path>) -> Result<PhsConfig> {
        let mut config = match explicit {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_from_files()?,
        };
        Self::apply_environment_variables(&mut config);
        Ok(config)
    }

    fn load_from_files() -> Result<PhsConfig> {
        for path in Self::find_config_files() {
            if path.is_file() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(&path);
            }
        }
        debug!("No configuration file found, using defaults");
        Ok(PhsConfig::default())
    }

    fn find_config_files() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(config_path) = env::var(CONFIG_ENV) {
            paths.push(PathBuf::from(config_path));
        }

        if let Ok(current_dir) = env::current_dir() {
            for name in [
                ".phs-validate.toml",
                ".phs-validate.yaml",
                ".phs-validate.yml",
                ".phs-validate.json",
            ] {
                paths.push(current_dir.join(name));
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".config/phs-validate/config.toml"));
        }

        paths
    }

    pub fn load_from_file(path: &Path) -> Result<PhsConfig> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        parse_by_extension(path, &content, "config")
    }

    fn apply_environment_variables(config: &mut PhsConfig) {
        if let Some(flag) = env::var(EXPAND_ENV).ok().and_then(|v| parse_bool(&v)) {
            config.validator.expand_hamiltonian = flag;
        }
        if let Some(flag) = env::var(PRETTY_ENV).ok().and_then(|v| parse_bool(&v)) {
            config.validator.pretty = flag;
        }
        if let Some(level) = env::var(LOG_LEVEL_ENV).ok().and_then(|v| LogLevel::parse(&v)) {
            config.logging.level = Some(level);
        }
    }

    pub fn generate_sample_config() -> String {
        toml::to_string_pretty(&PhsConfig::default())
            .unwrap_or_else(|_| "# Failed to generate config".to_string())
    }
}

/// Deserialize `content` according to the file extension of `path`;
/// unknown extensions try TOML, YAML and JSON in turn
pub fn parse_by_extension<T>(path: &Path, content: &str, what: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let value = match path.extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(content)
            .with_context(|| format!("Failed to parse YAML {what}: {}", path.display()))?,
        Some("json") => serde_json::from_str(content)
            .with_context(|| format!("Failed to parse JSON {what}: {}", path.display()))?,
        Some("toml") => toml::from_str(content)
            .with_context(|| format!("Failed to parse TOML {what}: {}", path.display()))?,
        _ => {
            if let Ok(value) = toml::from_str(content) {
                value
            } else if let Ok(value) = serde_yaml::from_str(content) {
                value
            } else if let Ok(value) = serde_json::from_str(content) {
                value
            } else {
                return Err(anyhow::anyhow!(
                    "Could not parse {what} file {} (tried TOML, YAML, JSON)",
                    path.display()
                ));
            }
        }
    };
    Ok(value)
}

/// Parse a boolean value from string with various formats
pub fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
