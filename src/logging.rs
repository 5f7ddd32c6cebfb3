//! Logging setup: console output plus an optional rotating log file
//!
//! Diagnostics (skipped operations, dropped load keys, written artifacts) go
//! through `tracing`; the summary tables themselves are printed to stdout.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

const LOG_FILE_PREFIX: &str = "caliper_report";

/// Logging configuration options
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "caliper_report=debug"); `RUST_LOG` wins
    pub level_filter: String,
    /// Directory for daily-rotated log files; console only when unset
    pub log_dir: Option<PathBuf>,
    /// Whether to include timestamps in console output
    pub console_timestamps: bool,
    /// Whether to use JSON format for file logs
    pub file_json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level_filter: "info,caliper_report=info".to_string(),
            log_dir: None,
            console_timestamps: true,
            file_json_format: false,
        }
    }
}

fn env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level_filter))
}

/// Initialize console logging and, when `log_dir` is set, a daily-rotating
/// file layer.
///
/// The returned guard must stay alive for the rest of the program so the
/// background writer flushes the file output.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error + Send + Sync>> {
    let console_layer = if config.console_timestamps {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_timer(ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f UTC".to_string()))
            .with_filter(env_filter(config))
            .boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .without_time()
            .with_filter(env_filter(config))
            .boxed()
    };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = vec![console_layer];
    let mut guard = None;

    if let Some(log_dir) = &config.log_dir {
        std::fs::create_dir_all(log_dir)?;
        let file_appender = tracing_appender::rolling::daily(log_dir, format!("{LOG_FILE_PREFIX}.log"));
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let file_layer = if config.file_json_format {
            fmt::layer()
                .json()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_timer(ChronoUtc::new("%Y-%m-%dT%H:%M:%S%.3fZ".to_string()))
                .with_filter(env_filter(config))
                .boxed()
        } else {
            fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false)
                .with_timer(ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f UTC".to_string()))
                .with_filter(env_filter(config))
                .boxed()
        };
        layers.push(file_layer);
    }

    tracing_subscriber::registry().with(layers).try_init()?;

    tracing::debug!(
        log_dir = ?config.log_dir,
        json_format = config.file_json_format,
        "Logging initialized"
    );

    Ok(guard)
}

/// Log basic environment information for debugging
pub fn log_system_info() {
    tracing::debug!(
        package_version = env!("CARGO_PKG_VERSION"),
        target_arch = std::env::consts::ARCH,
        target_os = std::env::consts::OS,
        "Environment information"
    );
}
