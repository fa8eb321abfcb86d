//! Configuration infrastructure
//!
//! Every setting has a compiled-in default in [`defaults`]; with no config file
//! and no environment overrides the scraper behaves exactly like the fixed
//! constants below. Overrides are layered in this order:
//! 1. compiled-in defaults
//! 2. optional `scraper_config.json` in the working directory
//! 3. `SCRAPER__<SECTION>__<KEY>` environment variables

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

pub use crate::infrastructure::parsing::ParsingConfig;

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub crawling: CrawlingConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
    pub selectors: ParsingConfig,
}

/// What to search for, how much to collect and where to write it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlingConfig {
    /// Search endpoint, without query string
    pub search_url: String,

    /// Search term, sent as the `ss` query parameter
    pub search_query: String,

    /// Stop paginating once this many products are collected
    pub target_product_count: usize,

    /// Pause between listing page requests in milliseconds
    pub page_delay_ms: u64,

    /// Pause between detail page requests in milliseconds
    pub detail_delay_ms: u64,

    /// CSV output path, overwritten on every run
    pub output_file: PathBuf,
}

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,

    /// Attempts per URL, including the first one
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds; doubles after each failure
    pub retry_initial_delay_ms: u64,
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    /// Directory for the log file
    pub log_dir: PathBuf,

    /// Log file name inside `log_dir`
    pub file_name: String,
}

impl Default for CrawlingConfig {
    fn default() -> Self {
        Self {
            search_url: defaults::SEARCH_URL.to_string(),
            search_query: defaults::SEARCH_QUERY.to_string(),
            target_product_count: defaults::TARGET_PRODUCT_COUNT,
            page_delay_ms: defaults::PAGE_DELAY_MS,
            detail_delay_ms: defaults::DETAIL_DELAY_MS,
            output_file: PathBuf::from(defaults::OUTPUT_FILE),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            max_attempts: defaults::RETRY_ATTEMPTS,
            retry_initial_delay_ms: defaults::RETRY_INITIAL_DELAY_MS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE_NAME.to_string(),
        }
    }
}

/// Configuration manager for loading and saving settings
pub struct ConfigManager {
    pub config_path: PathBuf,
    pub env_prefix: String,
    /// Stand-in for the process environment
    env_source: Option<config::Map<String, String>>,
}

impl ConfigManager {
    /// Manager reading `scraper_config.json` from the working directory
    pub fn new() -> Self {
        Self::with_path(defaults::CONFIG_FILE)
    }

    pub fn with_path(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            env_prefix: defaults::ENV_PREFIX.to_string(),
            env_source: None,
        }
    }

    /// Use a different environment variable prefix (tests use this to stay isolated)
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = prefix.to_string();
        self
    }

    #[cfg(test)]
    fn with_env_source(mut self, vars: &[(&str, &str)]) -> Self {
        self.env_source = Some(vars.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect());
        self
    }

    /// Load the layered configuration; a missing file is not an error
    pub fn load_config(&self) -> Result<AppConfig> {
        let settings = config::Config::builder()
            .add_source(
                config::Config::try_from(&AppConfig::default())
                    .context("Failed to serialize default configuration")?,
            )
            .add_source(
                config::File::from(self.config_path.as_path())
                    .format(config::FileFormat::Json)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix(&self.env_prefix)
                    .prefix_separator("__")
                    .separator("__")
                    .source(self.env_source.clone()),
            )
            .build()
            .with_context(|| format!("Failed to load configuration from {:?}", self.config_path))?;

        let app_config: AppConfig = settings
            .try_deserialize()
            .context("Configuration has invalid values")?;

        if self.config_path.exists() {
            info!("Loaded configuration from: {:?}", self.config_path);
        }
        Ok(app_config)
    }

    /// Save configuration as pretty JSON
    pub fn save_config(&self, config: &AppConfig) -> Result<()> {
        if let Some(parent) = self.config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_json::to_string_pretty(config).context("Failed to serialize configuration")?;
        std::fs::write(&self.config_path, content).context("Failed to write configuration file")?;

        info!("Saved configuration to: {:?}", self.config_path);
        Ok(())
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Default scraping configuration values
pub mod defaults {
    /// Directory search endpoint
    pub const SEARCH_URL: &str = "https://dir.indiamart.com/search.mp";

    /// Default search term
    pub const SEARCH_QUERY: &str = "led lights";

    /// Number of products to collect before moving on to detail pages
    pub const TARGET_PRODUCT_COUNT: usize = 100;

    /// Pause between listing pages
    pub const PAGE_DELAY_MS: u64 = 3000;

    /// Pause between detail pages
    pub const DETAIL_DELAY_MS: u64 = 2000;

    /// Default CSV output file
    pub const OUTPUT_FILE: &str = "indiamart_led_lights.csv";

    /// Browser user agent sent with every request
    pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    /// Default request timeout in seconds
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;

    /// Default attempts per URL
    pub const RETRY_ATTEMPTS: u32 = 3;

    /// Delay before the first retry in milliseconds
    pub const RETRY_INITIAL_DELAY_MS: u64 = 2000;

    pub const CONFIG_FILE: &str = "scraper_config.json";
    pub const ENV_PREFIX: &str = "SCRAPER";

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = true;
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE_NAME: &str = "scraper.log";
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_match_fixed_constants() {
        let config = AppConfig::default();
        assert_eq!(config.crawling.search_query, "led lights");
        assert_eq!(config.crawling.target_product_count, 100);
        assert_eq!(config.crawling.page_delay_ms, 3000);
        assert_eq!(config.crawling.detail_delay_ms, 2000);
        assert_eq!(config.crawling.output_file, PathBuf::from("indiamart_led_lights.csv"));
        assert_eq!(config.http.timeout_seconds, 10);
        assert_eq!(config.http.max_attempts, 3);
        assert_eq!(config.http.retry_initial_delay_ms, 2000);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("absent.json"))
            .with_env_prefix("SCRAPER_TEST_MISSING");

        assert_eq!(manager.load_config().unwrap(), AppConfig::default());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scraper_config.json");
        std::fs::write(
            &path,
            r#"{ "crawling": { "search_query": "street lights", "target_product_count": 20 } }"#,
        )
        .unwrap();

        let config = ConfigManager::with_path(&path)
            .with_env_prefix("SCRAPER_TEST_FILE")
            .load_config()
            .unwrap();

        assert_eq!(config.crawling.search_query, "street lights");
        assert_eq!(config.crawling.target_product_count, 20);
        assert_eq!(config.crawling.page_delay_ms, defaults::PAGE_DELAY_MS);
        assert_eq!(config.http, HttpConfig::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("scraper_config.json");
        std::fs::write(&path, r#"{ "crawling": { "target_product_count": 20 } }"#).unwrap();

        let config = ConfigManager::with_path(&path)
            .with_env_source(&[
                ("SCRAPER__CRAWLING__TARGET_PRODUCT_COUNT", "40"),
                ("SCRAPER__HTTP__TIMEOUT_SECONDS", "30"),
                ("UNRELATED__HTTP__MAX_ATTEMPTS", "9"),
            ])
            .load_config()
            .unwrap();

        assert_eq!(config.crawling.target_product_count, 40);
        assert_eq!(config.http.timeout_seconds, 30);
        assert_eq!(config.http.max_attempts, defaults::RETRY_ATTEMPTS);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let manager = ConfigManager::with_path(dir.path().join("nested/scraper_config.json"))
            .with_env_prefix("SCRAPER_TEST_SAVE");

        let mut config = AppConfig::default();
        config.http.max_attempts = 5;
        config.selectors.product_list_selectors.price = vec!["span.price".to_string()];
        manager.save_config(&config).unwrap();

        assert_eq!(manager.load_config().unwrap(), config);
    }
}
