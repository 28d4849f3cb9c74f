//! Multi-tier TOML configuration for the `cleancare` tool.
//!
//! Reads configuration from multiple sources with precedence:
//! CLI flags > env vars > config file > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The default log filter when neither `RUST_LOG` nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Errors from configuration loading.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Config file parse error at {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(ConfigError::InvalidValue {
                key: "output.format".into(),
                message: format!("expected 'text' or 'json', got '{other}'"),
            }),
        }
    }
}

/// Resolved settings for one invocation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub output: OutputFormat,
    /// Run auto-fix before the save gate in `check`.
    pub auto_fix: bool,
    pub log_level: String,
    pub config_dir: PathBuf,
    /// Problems found while reading the config file. The file's settings
    /// were replaced by defaults; callers log these once logging is up.
    pub diagnostics: Vec<ConfigError>,
}

/// Settings that can be read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub validation: ValidationSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationSettings {
    pub auto_fix: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingSettings {
    pub level: Option<String>,
}

/// CLI overrides that take highest precedence.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub output: Option<OutputFormat>,
    pub auto_fix: Option<bool>,
}

impl Settings {
    /// Load settings from all sources, applying precedence rules.
    ///
    /// Precedence (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables (`CLEANCARE_OUTPUT`, `CLEANCARE_LOG`)
    /// 3. Config file (`<config dir>/config.toml`)
    /// 4. Defaults
    pub fn load(overrides: CliOverrides) -> Result<Self, ConfigError> {
        Self::load_from(config_dir(), overrides, |key| std::env::var(key).ok())
    }

    fn load_from(
        config_dir: PathBuf,
        overrides: CliOverrides,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let (file, diagnostic) = load_settings_file(&config_dir.join("config.toml"));
        let mut settings = Self::resolve(overrides, file, config_dir, env)?;
        settings.diagnostics.extend(diagnostic);
        Ok(settings)
    }

    fn resolve(
        overrides: CliOverrides,
        file: SettingsFile,
        config_dir: PathBuf,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        // Resolve output: CLI > env > config file > text
        let env_output = env("CLEANCARE_OUTPUT")
            .map(|v| v.parse::<OutputFormat>())
            .transpose()?;
        let output = overrides
            .output
            .or(env_output)
            .or(file.output.format)
            .unwrap_or_default();

        let auto_fix = overrides
            .auto_fix
            .or(file.validation.auto_fix)
            .unwrap_or(false);

        let log_level = env("CLEANCARE_LOG")
            .or(file.logging.level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        Ok(Settings {
            output,
            auto_fix,
            log_level,
            config_dir,
            diagnostics: Vec::new(),
        })
    }
}

/// Get the config directory path (`$CLEANCARE_CONFIG_DIR` or `~/.cleancare/`).
pub fn config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("CLEANCARE_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    dirs_next::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".cleancare")
}

/// Parse a TOML settings file.
pub fn parse_settings_file(path: &Path) -> Result<SettingsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load a settings file, returning defaults when it is absent or malformed.
/// A malformed file also yields its parse error.
fn load_settings_file(path: &Path) -> (SettingsFile, Option<ConfigError>) {
    if !path.exists() {
        return (SettingsFile::default(), None);
    }
    match parse_settings_file(path) {
        Ok(file) => (file, None),
        Err(e) => (SettingsFile::default(), Some(e)),
    }
}
