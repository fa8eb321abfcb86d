//! Application layer
//!
//! Runs the crawl pipeline on top of the infrastructure services.

pub mod crawling_orchestrator;

pub use crawling_orchestrator::{CrawlPhase, CrawlSummary, CrawlingOrchestrator};
