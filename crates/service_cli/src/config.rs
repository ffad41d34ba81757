//! CLI configuration management
//!
//! Handles loading configuration from a TOML file and merging command-line
//! arguments (which clap also fills from `SOBOL_*` environment variables).
//!
//! Priority (highest to lowest):
//! 1. CLI arguments / environment variables
//! 2. Config file
//! 3. Default values

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use sobol_kernel::{EvaluationMode, IntegrationConfig, DEFAULT_MAX_CONCURRENCY};
use thiserror::Error;

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid output format: {0}. Must be one of: table, json")]
    InvalidFormat(String),

    #[error("Invalid concurrency bound: {0}. Must be at least 1")]
    InvalidConcurrency(usize),

    #[error("Configuration file error: {0}")]
    FileError(String),
}

/// Log levels supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(LogLevel::Trace),
            "debug" => Ok(LogLevel::Debug),
            "info" => Ok(LogLevel::Info),
            "warn" => Ok(LogLevel::Warn),
            "error" => Ok(LogLevel::Error),
            _ => Err(ConfigError::InvalidLogLevel(s.to_string())),
        }
    }
}

impl LogLevel {
    /// Convert log level to tracing filter string
    pub fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

/// How results are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(ConfigError::InvalidFormat(s.to_string())),
        }
    }
}

/// CLI configuration structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Checkpoint sample sizes, strictly increasing
    pub sample_sizes: Vec<usize>,
    /// Evaluate the integrand on the worker pool
    pub concurrent: bool,
    /// Worker pool size in concurrent mode
    pub max_concurrency: usize,
    /// Artificial delay per integrand call, in milliseconds
    pub sleep_ms: u64,
    /// Log per-worker call counts after integrating
    pub report_workers: bool,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
    /// Output format
    #[serde(deserialize_with = "deserialize_format")]
    pub format: OutputFormat,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

fn deserialize_format<'de, D>(deserializer: D) -> Result<OutputFormat, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    OutputFormat::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            sample_sizes: vec![100, 1_000, 10_000],
            concurrent: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            sleep_ms: 0,
            report_workers: false,
            log_level: LogLevel::Info,
            format: OutputFormat::Table,
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: CliConfig = toml::from_str(content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    ///
    /// Sample sizes are validated by the kernel, which reports the exact
    /// offending position.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_concurrency == 0 {
            return Err(ConfigError::InvalidConcurrency(self.max_concurrency));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(sizes) = &cli.sample_sizes {
            self.sample_sizes = sizes.clone();
        }
        if cli.concurrent {
            self.concurrent = true;
        }
        if let Some(max_concurrency) = cli.max_concurrency {
            self.max_concurrency = max_concurrency;
        }
        if let Some(sleep_ms) = cli.sleep_ms {
            self.sleep_ms = sleep_ms;
        }
        if cli.report_workers {
            self.report_workers = true;
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        Ok(())
    }

    /// Kernel configuration for these settings
    pub fn integration_config(&self) -> Result<IntegrationConfig, sobol_kernel::ConfigError> {
        IntegrationConfig::builder()
            .mode(EvaluationMode::from_flag(self.concurrent))
            .max_concurrency(self.max_concurrency)
            .build()
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Sample size override
    pub sample_sizes: Option<Vec<usize>>,
    /// Force concurrent evaluation
    pub concurrent: bool,
    /// Concurrency bound override
    pub max_concurrency: Option<usize>,
    /// Integrand delay override
    pub sleep_ms: Option<u64>,
    /// Force worker usage report
    pub report_workers: bool,
    /// Log level override
    pub log_level: Option<String>,
    /// Output format override
    pub format: Option<OutputFormat>,
}

/// Build configuration from all sources
pub fn build_config(cli: &CliArgs) -> Result<CliConfig, ConfigError> {
    let mut config = if let Some(config_path) = &cli.config_file {
        CliConfig::from_file(config_path)?
    } else {
        CliConfig::default()
    };

    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.sample_sizes, vec![100, 1000, 10000]);
        assert!(!config.concurrent);
        assert_eq!(config.max_concurrency, 20);
        assert_eq!(config.sleep_ms, 0);
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.format, OutputFormat::Table);
    }

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("DEBUG").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("Info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("WARN").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);

        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = CliConfig::from_toml(
            r#"
            sample_sizes = [10, 20, 40]
            concurrent = true
            max_concurrency = 6
            log_level = "DEBUG"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.sample_sizes, vec![10, 20, 40]);
        assert!(config.concurrent);
        assert_eq!(config.max_concurrency, 6);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.format, OutputFormat::Json);
        // Unset keys keep their defaults.
        assert_eq!(config.sleep_ms, 0);
    }

    #[test]
    fn test_from_toml_rejects_zero_concurrency() {
        let err = CliConfig::from_toml("max_concurrency = 0").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidConcurrency(0)));
    }

    #[test]
    fn test_from_toml_rejects_bad_level() {
        assert!(CliConfig::from_toml("log_level = \"loud\"").is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = CliConfig::from_file(Path::new("/nonexistent/sobol2d.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::FileError(_)));
    }

    #[test]
    fn test_cli_overrides_file_values() {
        let mut config = CliConfig::from_toml("sample_sizes = [5, 50]\nsleep_ms = 3").unwrap();
        let cli = CliArgs {
            sample_sizes: Some(vec![7, 70]),
            concurrent: true,
            max_concurrency: Some(2),
            log_level: Some("warn".to_string()),
            ..CliArgs::default()
        };
        config.merge_with_cli(&cli).unwrap();

        assert_eq!(config.sample_sizes, vec![7, 70]);
        assert!(config.concurrent);
        assert_eq!(config.max_concurrency, 2);
        assert_eq!(config.sleep_ms, 3);
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_build_config_without_file() {
        let config = build_config(&CliArgs::default()).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn test_integration_config_mapping() {
        let config = CliConfig {
            concurrent: true,
            max_concurrency: 3,
            ..CliConfig::default()
        };
        let kernel = config.integration_config().unwrap();
        assert_eq!(kernel.mode(), EvaluationMode::Concurrent);
        assert_eq!(kernel.max_concurrency(), 3);
    }
}
