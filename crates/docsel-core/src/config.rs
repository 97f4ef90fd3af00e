//! Layered configuration.
//!
//! Values are resolved from, lowest to highest precedence:
//! 1. Built-in defaults
//! 2. Environment variables (`DOCSEL_FILTER`, `DOCSEL_LOG`, `DOCSEL_FORMAT`)
//! 3. CLI flags
//!
//! Every resolved value remembers where it came from.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Environment variable holding a filter expression.
pub const ENV_FILTER: &str = "DOCSEL_FILTER";
/// Environment variable holding the log level.
pub const ENV_LOG: &str = "DOCSEL_LOG";
/// Environment variable holding the output format.
pub const ENV_FORMAT: &str = "DOCSEL_FORMAT";

/// Error type for configuration resolution.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable holds a value that cannot be used.
    #[error("invalid value '{value}' for {variable}: expected {expected}")]
    InvalidValue {
        variable: String,
        value: String,
        expected: String,
    },
}

// ============================================================================
// Configuration Sources
// ============================================================================

/// Configuration value source (for precedence tracking).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// Built-in default value.
    Default = 0,
    /// From environment variable.
    EnvVar = 1,
    /// From CLI flag (highest precedence).
    CliFlag = 2,
}

/// A configuration value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigValue<T> {
    /// The actual value.
    pub value: T,
    /// Where the value came from.
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    /// Create a new config value with the given source.
    pub fn new(value: T, source: ConfigSource) -> Self {
        ConfigValue { value, source }
    }

    /// Merge with another value, preferring higher precedence.
    pub fn merge(self, other: Self) -> Self {
        if other.source >= self.source {
            other
        } else {
            self
        }
    }
}

// ============================================================================
// Value Types
// ============================================================================

/// Log level for tracing output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl LogLevel {
    /// Lowercase name, as accepted by `EnvFilter`.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err("trace, debug, info, warn or error".to_string()),
        }
    }
}

/// How the CLI renders its responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Pretty-printed JSON (default).
    #[default]
    Json,
    /// Human-readable text.
    Text,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "text" => Ok(OutputFormat::Text),
            _ => Err("json or text".to_string()),
        }
    }
}

// ============================================================================
// Configuration Resolution
// ============================================================================

/// CLI configuration overrides.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    /// Repeated `--test`/`-t` flags, in order.
    pub filters: Vec<String>,
    /// `--log-level` flag.
    pub log_level: Option<LogLevel>,
    /// `--format` flag.
    pub output_format: Option<OutputFormat>,
}

/// Resolved configuration with precedence information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Filter expression; empty selects everything.
    pub filter_expression: ConfigValue<String>,
    /// Log level.
    pub log_level: ConfigValue<LogLevel>,
    /// Output format.
    pub output_format: ConfigValue<OutputFormat>,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        ResolvedConfig {
            filter_expression: ConfigValue::new(String::new(), ConfigSource::Default),
            log_level: ConfigValue::new(LogLevel::default(), ConfigSource::Default),
            output_format: ConfigValue::new(OutputFormat::default(), ConfigSource::Default),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from the process environment and CLI flags.
    pub fn resolve(overrides: &CliOverrides) -> Result<Self, ConfigError> {
        ResolvedConfig::resolve_with(|name| std::env::var(name).ok(), overrides)
    }

    /// Resolve configuration using `env` to look up environment variables.
    ///
    /// Precedence (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables
    /// 3. Defaults
    pub fn resolve_with<E>(env: E, overrides: &CliOverrides) -> Result<Self, ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        let mut config = ResolvedConfig::default();
        config.apply_env_vars(&env)?;
        config.apply_cli_overrides(overrides);
        Ok(config)
    }

    fn apply_env_vars<E>(&mut self, env: &E) -> Result<(), ConfigError>
    where
        E: Fn(&str) -> Option<String>,
    {
        if let Some(expression) = env(ENV_FILTER) {
            self.filter_expression = self
                .filter_expression
                .clone()
                .merge(ConfigValue::new(expression, ConfigSource::EnvVar));
        }

        if let Some(level) = env(ENV_LOG) {
            let level = parse_env(ENV_LOG, &level)?;
            self.log_level = self
                .log_level
                .clone()
                .merge(ConfigValue::new(level, ConfigSource::EnvVar));
        }

        if let Some(format) = env(ENV_FORMAT) {
            let format = parse_env(ENV_FORMAT, &format)?;
            self.output_format = self
                .output_format
                .clone()
                .merge(ConfigValue::new(format, ConfigSource::EnvVar));
        }

        Ok(())
    }

    fn apply_cli_overrides(&mut self, overrides: &CliOverrides) {
        // Repeated flags are joined by a single space into one expression
        if !overrides.filters.is_empty() {
            self.filter_expression =
                ConfigValue::new(overrides.filters.join(" "), ConfigSource::CliFlag);
        }

        if let Some(level) = overrides.log_level {
            self.log_level = ConfigValue::new(level, ConfigSource::CliFlag);
        }

        if let Some(format) = overrides.output_format {
            self.output_format = ConfigValue::new(format, ConfigSource::CliFlag);
        }
    }
}

fn parse_env<T>(variable: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = String>,
{
    value.parse().map_err(|expected| ConfigError::InvalidValue {
        variable: variable.to_string(),
        value: value.to_string(),
        expected,
    })
}
