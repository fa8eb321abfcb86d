//! Crawl orchestration
//!
//! Drives one complete run: paginate the search results until the target is
//! reached or a page comes back empty, enrich each record from its detail page,
//! then export. Every request is awaited before the next one starts.

use anyhow::{Context, Result};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::product::ProductRecord;
use crate::infrastructure::config::{AppConfig, CrawlingConfig};
use crate::infrastructure::csv_exporter;
use crate::infrastructure::parsing::{DetailParseContext, ParseContext, ProductDetailParser, ProductListParser};
use crate::infrastructure::simple_http_client::PageFetcher;

/// Where a run currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlPhase {
    Paginating,
    DetailFetching,
    Exporting,
    Done,
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Paginating => "paginating",
            Self::DetailFetching => "detail fetching",
            Self::Exporting => "exporting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Counters for a finished run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    /// Listing pages successfully retrieved
    pub pages_fetched: u32,
    pub records_collected: usize,
    /// Records whose detail page was retrieved and parsed
    pub details_enriched: usize,
    /// Records whose detail page could not be retrieved
    pub detail_failures: usize,
    /// Records without a detail page link
    pub records_skipped: usize,
    pub output_path: PathBuf,
}

/// Sequential listing → detail → export pipeline over any [`PageFetcher`]
pub struct CrawlingOrchestrator<F: PageFetcher> {
    fetcher: F,
    list_parser: ProductListParser,
    detail_parser: ProductDetailParser,
    search_url: Url,
    config: CrawlingConfig,
    phase: CrawlPhase,
    summary: CrawlSummary,
}

impl<F: PageFetcher> CrawlingOrchestrator<F> {
    /// Build the pipeline; invalid selectors or search URL fail here, before any request
    pub fn new(fetcher: F, config: &AppConfig) -> Result<Self> {
        let list_parser = ProductListParser::with_config(&config.selectors.product_list_selectors)
            .context("Failed to create product list parser")?;
        let detail_parser = ProductDetailParser::with_config(&config.selectors.product_detail_selectors)
            .context("Failed to create product detail parser")?;
        let search_url = Url::parse(&config.crawling.search_url)
            .with_context(|| format!("Invalid search URL '{}'", config.crawling.search_url))?;

        Ok(Self {
            fetcher,
            list_parser,
            detail_parser,
            search_url,
            config: config.crawling.clone(),
            phase: CrawlPhase::Paginating,
            summary: CrawlSummary {
                output_path: config.crawling.output_file.clone(),
                ..CrawlSummary::default()
            },
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn summary(&self) -> &CrawlSummary {
        &self.summary
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn into_fetcher(self) -> F {
        self.fetcher
    }

    /// Search results URL for a 1-based page number, e.g. `...?ss=led+lights&page_no=2`
    pub fn listing_page_url(&self, page: u32) -> String {
        let mut url = self.search_url.clone();
        url.query_pairs_mut()
            .append_pair("ss", &self.config.search_query)
            .append_pair("page_no", &page.to_string());
        url.into()
    }

    /// Fetch listing pages from page 1 until the target count is reached or a
    /// page yields nothing. The result never exceeds the target.
    pub async fn collect_listings(&mut self) -> Vec<ProductRecord> {
        self.phase = CrawlPhase::Paginating;
        let target = self.config.target_product_count;
        let mut records: Vec<ProductRecord> = Vec::new();
        let mut page = 1;

        while records.len() < target {
            let url = self.listing_page_url(page);
            info!("Scraping listing page {}: {}", page, url);

            let Some(body) = self.fetcher.fetch_page(&url).await else {
                warn!("Failed to retrieve listing page {}. Stopping pagination.", page);
                break;
            };
            self.summary.pages_fetched += 1;

            let page_records = self.list_parser.parse_page(&body, &ParseContext::new(page, url.as_str()));
            if page_records.is_empty() {
                info!("No more products found on page {}. Stopping.", page);
                break;
            }

            let found = page_records.len();
            records.extend(page_records);
            info!(
                "Collected {} products from page {}. Total collected: {}",
                found,
                page,
                records.len()
            );

            if records.len() >= target {
                records.truncate(target);
                info!("Reached target of {} products.", target);
                break;
            }

            page += 1;
            pause(self.config.page_delay_ms).await;
        }

        self.summary.records_collected = records.len();
        records
    }

    /// Visit the detail page of every record that has one, in order.
    /// A failed fetch leaves that record as it was and moves on.
    pub async fn enrich_details(&mut self, records: &mut [ProductRecord]) {
        self.phase = CrawlPhase::DetailFetching;
        let total = records.len();

        for (index, record) in records.iter_mut().enumerate() {
            let Some(url) = record.product_url.clone() else {
                info!("Skipping product {}/{}: no detail page URL", index + 1, total);
                self.summary.records_skipped += 1;
                continue;
            };

            info!("Scraping detail page {}/{}: {}", index + 1, total, url);
            match self.fetcher.fetch_page(&url).await {
                Some(body) => {
                    self.detail_parser
                        .parse_into(&body, &DetailParseContext::new(url.as_str(), index), record);
                    self.summary.details_enriched += 1;
                    debug!("Enriched '{}'", record.display_name());
                }
                None => {
                    warn!("Failed to retrieve detail page for product {}: {}", index + 1, url);
                    self.summary.detail_failures += 1;
                }
            }

            pause(self.config.detail_delay_ms).await;
        }
    }

    /// Run all phases and write the output file
    pub async fn run(&mut self) -> Result<CrawlSummary> {
        info!("Starting crawl for '{}'", self.config.search_query);

        let mut records = self.collect_listings().await;
        info!("Collected {} products from listing pages", records.len());

        self.enrich_details(&mut records).await;

        self.phase = CrawlPhase::Exporting;
        csv_exporter::export(&records, &self.config.output_file)?;

        self.phase = CrawlPhase::Done;
        let summary = self.summary.clone();
        info!(
            "Crawl finished: {} pages, {} products, {} enriched, {} failed, {} skipped, output {:?}",
            summary.pages_fetched,
            summary.records_collected,
            summary.details_enriched,
            summary.detail_failures,
            summary.records_skipped,
            summary.output_path
        );
        Ok(summary)
    }
}

async fn pause(delay_ms: u64) {
    if delay_ms > 0 {
        sleep(Duration::from_millis(delay_ms)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct NoPages;

    #[async_trait]
    impl PageFetcher for NoPages {
        async fn fetch_page(&self, _url: &str) -> Option<String> {
            None
        }
    }

    #[test]
    fn test_listing_page_url() {
        let orchestrator = CrawlingOrchestrator::new(NoPages, &AppConfig::default()).unwrap();

        assert_eq!(
            orchestrator.listing_page_url(1),
            "https://dir.indiamart.com/search.mp?ss=led+lights&page_no=1"
        );
        assert_eq!(
            orchestrator.listing_page_url(12),
            "https://dir.indiamart.com/search.mp?ss=led+lights&page_no=12"
        );
    }

    #[test]
    fn test_invalid_search_url_is_rejected() {
        let mut config = AppConfig::default();
        config.crawling.search_url = "not a url".to_string();
        assert!(CrawlingOrchestrator::new(NoPages, &config).is_err());
    }

    #[tokio::test]
    async fn test_fetch_failure_ends_pagination() {
        let mut orchestrator = CrawlingOrchestrator::new(NoPages, &AppConfig::default()).unwrap();

        let records = orchestrator.collect_listings().await;

        assert!(records.is_empty());
        assert_eq!(orchestrator.summary().pages_fetched, 0);
        assert_eq!(orchestrator.phase(), CrawlPhase::Paginating);
    }

    #[tokio::test]
    async fn test_zero_target_fetches_nothing() {
        let mut config = AppConfig::default();
        config.crawling.target_product_count = 0;
        let mut orchestrator = CrawlingOrchestrator::new(NoPages, &config).unwrap();

        assert!(orchestrator.collect_listings().await.is_empty());
    }
}
