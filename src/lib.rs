//! IndiaMART product scraper
//!
//! Collects LED lighting products from the directory's search results, enriches
//! each one from its detail page and writes the lot to a CSV file.

pub mod application;
pub mod domain;
pub mod infrastructure;

use anyhow::{Context, Result};
use tracing::{info, Instrument};

pub use application::{CrawlPhase, CrawlSummary, CrawlingOrchestrator};
pub use domain::{ProductDetail, ProductRecord};
pub use infrastructure::{AppConfig, ConfigManager, HttpClient, PageFetcher};

/// Load configuration, set up logging and run one crawl with the real HTTP client
pub async fn run() -> Result<CrawlSummary> {
    let config = ConfigManager::new()
        .load_config()
        .context("Failed to load configuration")?;

    infrastructure::init_logging_or_console(config.logging.clone())?;
    infrastructure::logging::log_system_info();

    let run_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("crawl", run_id = %run_id);

    async move {
        info!("Run {} started", run_id);
        let client = HttpClient::with_config(&config.http)?;
        let mut orchestrator = CrawlingOrchestrator::new(client, &config)?;
        orchestrator.run().await
    }
    .instrument(span)
    .await
}
