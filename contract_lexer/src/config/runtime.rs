// RUNTIME PREFERENCES (User Experience)

use crate::config::compile_time::scan::MAX_REPORTED_DIAGNOSTICS;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::path::Path;

/// Errors raised while loading a runtime configuration file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("Invalid TOML configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanPreferences {
    /// Whether SPACE and COMMENT tokens are kept in scan reports
    pub include_trivia: bool,

    /// Whether the scan stops at the first delimiter imbalance
    pub stop_on_balance_error: bool,

    /// How many diagnostics a report keeps before dropping the rest
    pub max_reported_diagnostics: usize,
}

impl Default for ScanPreferences {
    fn default() -> Self {
        Self {
            include_trivia: env::var(env_vars::SCAN_INCLUDE_TRIVIA)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            stop_on_balance_error: env::var(env_vars::SCAN_STOP_ON_BALANCE_ERROR)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            max_reported_diagnostics: env::var(env_vars::SCAN_MAX_DIAGNOSTICS)
                .ok()
                .and_then(|v| v.parse::<usize>().ok())
                .unwrap_or(100)
                .min(MAX_REPORTED_DIAGNOSTICS),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingPreferences {
    /// Whether to use structured JSON logging
    pub use_structured_logging: bool,

    /// Whether to enable console output
    pub enable_console_logging: bool,

    /// Minimum level that reaches the configured logger
    pub min_log_level: LogLevel,

    /// Whether events carry the name of the source being scanned
    pub include_source_context: bool,
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self {
            use_structured_logging: env::var(env_vars::LOGGING_USE_STRUCTURED)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            enable_console_logging: env::var(env_vars::LOGGING_ENABLE_CONSOLE)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            min_log_level: env::var(env_vars::LOGGING_MIN_LEVEL)
                .ok()
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            include_source_context: env::var(env_vars::LOGGING_INCLUDE_SOURCE_CONTEXT)
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(true),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error = 0,
    Warning = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "ERROR",
            LogLevel::Warning => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
        }
    }

    /// Convert to events::LogLevel for compatibility
    pub fn to_events_log_level(&self) -> crate::logging::events::LogLevel {
        match self {
            LogLevel::Error => crate::logging::events::LogLevel::Error,
            LogLevel::Warning => crate::logging::events::LogLevel::Warning,
            LogLevel::Info => crate::logging::events::LogLevel::Info,
            LogLevel::Debug => crate::logging::events::LogLevel::Debug,
        }
    }
}

/// Parse log level from string (used for environment variables)
pub(crate) fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Complete runtime configuration, usually read from a TOML file.
///
/// ```toml
/// [scan]
/// include_trivia = true
///
/// [logging]
/// min_log_level = "debug"
///
/// [rules]
/// "com.example.*" = "enabled"
/// "com.example.internal.*" = "disabled"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub scan: ScanPreferences,
    pub logging: LoggingPreferences,
    /// Pattern to rule-value table used to populate a `PatternMap`
    pub rules: BTreeMap<String, String>,
}

impl RuntimeConfig {
    /// Parse a configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: RuntimeConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.max_reported_diagnostics > MAX_REPORTED_DIAGNOSTICS {
            return Err(ConfigError::InvalidValue {
                key: "scan.max_reported_diagnostics".to_string(),
                message: format!(
                    "{} exceeds the limit of {}",
                    self.scan.max_reported_diagnostics, MAX_REPORTED_DIAGNOSTICS
                ),
            });
        }
        Ok(())
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Scan
    pub const SCAN_INCLUDE_TRIVIA: &str = "CONTRACT_LEXER_SCAN_INCLUDE_TRIVIA";
    pub const SCAN_STOP_ON_BALANCE_ERROR: &str = "CONTRACT_LEXER_SCAN_STOP_ON_BALANCE_ERROR";
    pub const SCAN_MAX_DIAGNOSTICS: &str = "CONTRACT_LEXER_SCAN_MAX_DIAGNOSTICS";

    // Logging
    pub const LOGGING_USE_STRUCTURED: &str = "CONTRACT_LEXER_LOGGING_USE_STRUCTURED";
    pub const LOGGING_ENABLE_CONSOLE: &str = "CONTRACT_LEXER_LOGGING_ENABLE_CONSOLE";
    pub const LOGGING_MIN_LEVEL: &str = "CONTRACT_LEXER_LOGGING_MIN_LEVEL";
    pub const LOGGING_INCLUDE_SOURCE_CONTEXT: &str =
        "CONTRACT_LEXER_LOGGING_INCLUDE_SOURCE_CONTEXT";
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level("debug"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_from_toml_str() {
        let config = RuntimeConfig::from_toml_str(
            r#"
            [scan]
            include_trivia = true
            max_reported_diagnostics = 5

            [logging]
            min_log_level = "debug"

            [rules]
            "com.example.*" = "enabled"
            "com/example/internal/*" = "disabled"
            "#,
        )
        .unwrap();

        assert!(config.scan.include_trivia);
        assert_eq!(config.scan.max_reported_diagnostics, 5);
        assert_eq!(config.logging.min_log_level, LogLevel::Debug);
        assert_eq!(config.rules.len(), 2);
        assert_eq!(
            config.rules.get("com.example.*").map(String::as_str),
            Some("enabled")
        );
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = RuntimeConfig::from_toml_str("").unwrap();
        assert!(config.rules.is_empty());
        assert!(config.scan.max_reported_diagnostics <= MAX_REPORTED_DIAGNOSTICS);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let result = RuntimeConfig::from_toml_str("[scan\ninclude_trivia = ");
        assert_matches!(result, Err(ConfigError::Parse(_)));
    }

    #[test]
    fn test_diagnostic_limit_enforced() {
        let content = format!(
            "[scan]\nmax_reported_diagnostics = {}\n",
            MAX_REPORTED_DIAGNOSTICS + 1
        );
        let result = RuntimeConfig::from_toml_str(&content);
        assert_matches!(result, Err(ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lexer.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[rules]\n\"a.*\" = \"on\"").unwrap();

        let config = RuntimeConfig::load(&path).unwrap();
        assert_eq!(config.rules.get("a.*").map(String::as_str), Some("on"));

        let missing = RuntimeConfig::load(dir.path().join("missing.toml"));
        assert_matches!(missing, Err(ConfigError::Read { .. }));
    }

    #[test]
    fn test_env_var_names_exist() {
        assert!(!env_vars::SCAN_INCLUDE_TRIVIA.is_empty());
        assert!(!env_vars::LOGGING_MIN_LEVEL.is_empty());
    }
}
