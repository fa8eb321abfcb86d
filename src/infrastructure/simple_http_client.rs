//! HTTP client for page retrieval with bounded retry
//!
//! Every failure (connection error, timeout, non-2xx status) is retried with a
//! doubling delay. Once the attempts are used up the caller simply gets no
//! content; it cannot tell a 404 from a timeout.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::infrastructure::config::HttpConfig;

/// Something that can turn a URL into a page body
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Page body, or `None` when the page could not be retrieved
    async fn fetch_page(&self, url: &str) -> Option<String>;
}

/// Attempt limit and first backoff delay; the delay doubles after every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay,
        }
    }

    /// Delay to wait after failed attempt `attempt` (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.initial_delay
            .saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
    }
}

/// Run `operation` until it succeeds or the policy's attempts are used up.
///
/// Sleeps between attempts only, never after the last one. Returns the last
/// error when every attempt failed.
pub async fn retry_with_backoff<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    E: Display,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempt = 1;
    loop {
        match operation().await {
            Ok(value) => {
                debug!("{} succeeded on attempt {}", label, attempt);
                return Ok(value);
            }
            Err(e) if attempt < policy.max_attempts => {
                let delay = policy.delay_after(attempt);
                warn!(
                    "Attempt {}/{} failed for {}: {}. Retrying in {:?}",
                    attempt, policy.max_attempts, label, e, delay
                );
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => {
                error!("Failed to fetch {} after {} attempts: {}", label, policy.max_attempts, e);
                return Err(e);
            }
        }
    }
}

/// HTTP client with a fixed header set, timeout and retry policy
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    retry_policy: RetryPolicy,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .gzip(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            retry_policy: RetryPolicy::new(config.max_attempts, Duration::from_millis(config.retry_initial_delay_ms)),
        })
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Fetch a page body with retries; `None` once every attempt has failed
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        info!("🌐 HTTP GET: {}", url);
        retry_with_backoff(&self.retry_policy, url, || self.fetch_html_once(url))
            .await
            .ok()
    }

    /// Single attempt; non-2xx statuses count as failures
    async fn fetch_html_once(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| anyhow!("HTTP request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("HTTP error {}: {}", status, url));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read response body: {}", e))?;

        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_page(&self, url: &str) -> Option<String> {
        self.fetch_html(url).await
    }
}
