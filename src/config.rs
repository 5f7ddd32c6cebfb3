//! Run configuration loaded from `report.toml`.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use tracing::info;

use crate::common::constants::{
    CONFIG_PATH_ENV, DEFAULT_BASE_DIR, DEFAULT_CONFIG_FILE, DEFAULT_OPERATIONS, DEFAULT_OUTPUT_DIR,
};
use crate::logging::LoggingConfig;
use crate::report::errors::ReportError;

/// Application section of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ApplicationTomlConfig {
    pub base_dir: Option<String>,
    pub operations: Option<Vec<String>>,
    pub output_dir: Option<String>,
    pub chart_format: Option<String>, // "svg", "json" or "none"
    pub write_summary_csv: Option<bool>,
}

/// Logging section of the TOML file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingTomlConfig {
    pub level_filter: Option<String>,
    pub log_dir: Option<String>,
    pub console_timestamps: Option<bool>,
    pub file_json_format: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct TomlConfig {
    #[serde(default)]
    pub application: ApplicationTomlConfig,
    #[serde(default)]
    pub logging: LoggingTomlConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Svg,
    Json,
    None,
}

impl FromStr for ChartFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(ChartFormat::Svg),
            "json" => Ok(ChartFormat::Json),
            "none" | "off" => Ok(ChartFormat::None),
            other => Err(ReportError::Config(format!("Unsupported chart_format: {}", other))),
        }
    }
}

/// Runtime configuration (converted from TOML)
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub base_dir: PathBuf,
    pub operations: Vec<String>,
    pub output_dir: PathBuf,
    pub chart_format: ChartFormat,
    pub write_summary_csv: bool,
    pub logging_config: LoggingConfig,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            operations: DEFAULT_OPERATIONS.iter().map(|op| op.to_string()).collect(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            chart_format: ChartFormat::Svg,
            write_summary_csv: true,
            logging_config: LoggingConfig::default(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ReportError> {
        let config_content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&config_content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ReportError> {
        let toml_config: TomlConfig = toml::from_str(content)?;
        Self::from_toml_config(toml_config)
    }

    fn from_toml_config(toml_config: TomlConfig) -> Result<Self, ReportError> {
        let defaults = Self::default();
        let app = toml_config.application;
        let logging = toml_config.logging;

        let operations = match app.operations {
            Some(ops) if !ops.is_empty() => ops,
            _ => defaults.operations,
        };

        let chart_format = match app.chart_format {
            Some(format) => format.parse()?,
            None => defaults.chart_format,
        };

        let default_logging = defaults.logging_config;
        let logging_config = LoggingConfig {
            level_filter: logging.level_filter.unwrap_or(default_logging.level_filter),
            log_dir: logging.log_dir.map(PathBuf::from).or(default_logging.log_dir),
            console_timestamps: logging.console_timestamps.unwrap_or(default_logging.console_timestamps),
            file_json_format: logging.file_json_format.unwrap_or(default_logging.file_json_format),
        };

        Ok(Self {
            base_dir: app.base_dir.map(PathBuf::from).unwrap_or(defaults.base_dir),
            operations,
            output_dir: app.output_dir.map(PathBuf::from).unwrap_or(defaults.output_dir),
            chart_format,
            write_summary_csv: app.write_summary_csv.unwrap_or(defaults.write_summary_csv),
            logging_config,
        })
    }

    /// Resolve which config file to read, if any.
    ///
    /// An explicit path (CLI argument, then `CALIPER_REPORT_CONFIG`) is always
    /// returned; `report.toml` in the working directory only when it exists.
    pub fn locate(cli_arg: Option<String>) -> Option<PathBuf> {
        cli_arg
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok().filter(|v| !v.is_empty()))
            .map(PathBuf::from)
            .or_else(|| {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then_some(default)
            })
    }

    /// Load from the located file, or fall back to built-in defaults.
    pub fn load(cli_arg: Option<String>) -> Result<Self, ReportError> {
        match Self::locate(cli_arg) {
            Some(path) => {
                let config = Self::from_toml(&path)?;
                info!(path = %path.display(), "Loaded report configuration");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ReportConfig::default();
        assert_eq!(config.base_dir, PathBuf::from("./6nos5bps2510/reports_csv"));
        assert_eq!(config.operations, vec!["open", "query", "transfer"]);
        assert_eq!(config.chart_format, ChartFormat::Svg);
        assert!(config.write_summary_csv);
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ReportConfig::from_toml_str("").unwrap();
        assert_eq!(config.operations.len(), 3);
        assert_eq!(config.output_dir, PathBuf::from("report_output"));
        assert!(config.logging_config.log_dir.is_none());
    }

    #[test]
    fn test_full_toml() {
        let content = r#"
            [application]
            base_dir = "/data/reports_csv"
            operations = ["open"]
            output_dir = "out"
            chart_format = "json"
            write_summary_csv = false

            [logging]
            level_filter = "debug"
            log_dir = "logs"
            console_timestamps = false
            file_json_format = true
        "#;
        let config = ReportConfig::from_toml_str(content).unwrap();
        assert_eq!(config.base_dir, PathBuf::from("/data/reports_csv"));
        assert_eq!(config.operations, vec!["open"]);
        assert_eq!(config.chart_format, ChartFormat::Json);
        assert!(!config.write_summary_csv);
        assert_eq!(config.logging_config.level_filter, "debug");
        assert_eq!(config.logging_config.log_dir, Some(PathBuf::from("logs")));
        assert!(!config.logging_config.console_timestamps);
        assert!(config.logging_config.file_json_format);
    }

    #[test]
    fn test_empty_operations_fall_back() {
        let config = ReportConfig::from_toml_str("[application]\noperations = []\n").unwrap();
        assert_eq!(config.operations, vec!["open", "query", "transfer"]);
    }

    #[test]
    fn test_invalid_chart_format() {
        let result = ReportConfig::from_toml_str("[application]\nchart_format = \"png\"\n");
        assert!(matches!(result, Err(ReportError::Config(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = ReportConfig::from_toml_str("[application]\nbase_dirr = \"x\"\n");
        assert!(matches!(result, Err(ReportError::ConfigParse(_))));
    }

    #[test]
    fn test_from_toml_file_and_explicit_locate() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("custom.toml");
        std::fs::write(&path, "[application]\nchart_format = \"none\"\n").unwrap();

        let located = ReportConfig::locate(Some(path.to_string_lossy().into_owned()));
        assert_eq!(located, Some(path.clone()));
        assert_eq!(ReportConfig::load(Some(path.to_string_lossy().into_owned())).unwrap().chart_format, ChartFormat::None);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let result = ReportConfig::load(Some("/nonexistent/report.toml".to_string()));
        assert!(matches!(result, Err(ReportError::Io(_))));
    }
}
