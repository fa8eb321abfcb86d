//! Infrastructure layer: HTTP retrieval, HTML parsing, CSV export,
//! configuration and logging.

pub mod config;
pub mod csv_exporter;
pub mod logging;
pub mod parsing;
pub mod parsing_error;
pub mod simple_http_client;

pub use config::{AppConfig, ConfigManager};
pub use logging::{init_logging_or_console, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult, ProductDetailParser, ProductListParser};
pub use simple_http_client::{HttpClient, PageFetcher, RetryPolicy};
