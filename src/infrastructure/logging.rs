//! Logging system configuration and initialization
//!
//! Console output plus an optional plain-text log file (`logs/scraper.log` by
//! default), both stamped with local time. `RUST_LOG` overrides the configured
//! level when set.

use anyhow::{anyhow, Context, Result};
use chrono::Local;
use lazy_static::lazy_static;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::{info, warn};
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{
    fmt::{self, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Registry,
};

pub use crate::infrastructure::config::LoggingConfig;

// Keeps the non-blocking file writer alive for the whole process
lazy_static! {
    static ref LOG_GUARDS: Mutex<Vec<WorkerGuard>> = Mutex::new(Vec::new());
}

/// Local wall-clock timestamps with millisecond precision
struct LocalTimeFormatter;

impl FormatTime for LocalTimeFormatter {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Full path of the log file described by `config`
pub fn log_file_path(config: &LoggingConfig) -> PathBuf {
    config.log_dir.join(&config.file_name)
}

/// Build the level filter: `RUST_LOG` if present, otherwise the configured
/// level with HTTP internals kept quiet unless tracing is requested.
fn build_env_filter(level: &str) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let mut filter = EnvFilter::try_new(level).with_context(|| format!("Invalid log level '{}'", level))?;

    if !level.to_lowercase().contains("trace") {
        for directive in ["reqwest=info", "hyper=warn", "hyper_util=warn", "h2=warn", "html5ever=warn", "selectors=warn"] {
            filter = filter.add_directive(directive.parse()?);
        }
    }

    Ok(filter)
}

/// Initialize logging with custom configuration
///
/// Fails if neither output is enabled or if a global subscriber is already set.
pub fn init_logging_with_config(config: LoggingConfig) -> Result<()> {
    if !config.file_output && !config.console_output {
        return Err(anyhow!("No logging output configured"));
    }

    let env_filter = build_env_filter(&config.level)?;

    let file_layer = if config.file_output {
        std::fs::create_dir_all(&config.log_dir)
            .with_context(|| format!("Failed to create log directory {:?}", config.log_dir))?;

        let file_appender = rolling::never(&config.log_dir, &config.file_name);
        let (file_writer, file_guard) = non_blocking(file_appender);
        LOG_GUARDS
            .lock()
            .map_err(|_| anyhow!("Log guard registry is poisoned"))?
            .push(file_guard);

        Some(
            fmt::Layer::new()
                .with_writer(file_writer)
                .with_timer(LocalTimeFormatter)
                .with_target(false)
                .with_ansi(false),
        )
    } else {
        None
    };

    let console_layer = config.console_output.then(|| {
        fmt::Layer::new()
            .with_writer(std::io::stdout)
            .with_timer(LocalTimeFormatter)
            .with_target(false)
    });

    Registry::default()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {}", e))?;

    info!("Logging system initialized");
    info!("Log level: {}", config.level);
    info!("Console output: {}", config.console_output);
    if config.file_output {
        info!("Log file: {:?}", log_file_path(&config));
    }

    Ok(())
}

/// Initialize logging, dropping the file output when the log directory is unusable.
///
/// Returns whether file logging is active. Only fails when no output at all
/// can be set up.
pub fn init_logging_or_console(config: LoggingConfig) -> Result<bool> {
    if config.file_output && config.console_output {
        if let Err(e) = std::fs::create_dir_all(&config.log_dir) {
            let log_dir = config.log_dir.clone();
            init_logging_with_config(LoggingConfig {
                file_output: false,
                ..config
            })?;
            warn!("Cannot create log directory {:?} ({}); logging to console only", log_dir, e);
            return Ok(false);
        }
    }

    let file_output = config.file_output;
    init_logging_with_config(config)?;
    Ok(file_output)
}

/// Log system information for diagnostics
pub fn log_system_info() {
    info!("=== IndiaMART Scraper ===");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    info!("Operating system: {} ({})", std::env::consts::OS, std::env::consts::ARCH);
    if let Ok(current_dir) = std::env::current_dir() {
        info!("Working directory: {:?}", current_dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_config_default() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, "info");
        assert!(config.console_output);
        assert!(config.file_output);
        assert_eq!(log_file_path(&config), PathBuf::from("logs/scraper.log"));
    }

    #[test]
    fn test_filter_accepts_levels() {
        assert!(build_env_filter("debug").is_ok());
        assert!(build_env_filter("trace").is_ok());
    }

    // Installs the global subscriber; keep it the only test in this binary that does
    #[test]
    fn test_unusable_log_dir_falls_back_to_console() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("logs");
        std::fs::write(&not_a_dir, "occupied").unwrap();

        let config = LoggingConfig {
            log_dir: not_a_dir.clone(),
            ..LoggingConfig::default()
        };

        assert!(!init_logging_or_console(config).unwrap());
        assert!(not_a_dir.is_file());
    }

    #[test]
    fn test_no_outputs_is_rejected() {
        let config = LoggingConfig {
            console_output: false,
            file_output: false,
            ..LoggingConfig::default()
        };
        assert!(init_logging_with_config(config).is_err());
    }
}
