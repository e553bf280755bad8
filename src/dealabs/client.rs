//! HTTP client for Dealabs requests using wreq for TLS fingerprint emulation.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use rand::RngExt;
use std::time::Duration;
use tracing::{debug, info, warn};
use wreq::Client;
use wreq_util::Emulation;

const BASE_URL: &str = "https://www.dealabs.com";

/// Failed requests are retried with a linearly growing backoff.
const MAX_ATTEMPTS: u32 = 3;
const RETRY_BACKOFF_MS: u64 = 2000;

/// Trait for fetching Dealabs pages - enables mocking for tests.
#[async_trait]
pub trait DealSource: Send + Sync {
    /// Fetches a search results page for the query and returns the HTML.
    async fn search(&self, query: &str) -> Result<String>;

    /// Fetches a single deal thread page, by path or full URL.
    async fn thread(&self, path: &str) -> Result<String>;
}

/// Dealabs HTTP client with browser impersonation and anti-bot measures.
pub struct DealabsClient {
    client: Client,
    delay_ms: u64,
    delay_jitter_ms: u64,
    base_url: Option<String>,
}

impl DealabsClient {
    /// Creates a new Dealabs client with the given configuration.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config, None)
    }

    /// Creates a new Dealabs client with an optional custom base URL (for testing).
    pub fn with_base_url(config: &Config, base_url: Option<String>) -> Result<Self> {
        let mut builder = Client::builder()
            .cookie_store(true)
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10));

        if let Some(proxy_url) = &config.proxy {
            debug!("Configuring proxy: {}", proxy_url);
            let proxy = wreq::Proxy::all(proxy_url).context("Failed to configure proxy")?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            delay_ms: config.delay_ms,
            delay_jitter_ms: config.delay_jitter_ms,
            base_url,
        })
    }

    /// Returns the base URL (custom for testing, or production).
    fn base_url(&self) -> String {
        self.base_url.clone().unwrap_or_else(|| BASE_URL.to_string())
    }

    /// Performs a GET request with delays and a bounded retry loop.
    async fn get(&self, url: &str) -> Result<String> {
        let mut attempt = 1;
        loop {
            self.delay().await;

            match self.try_get(url).await {
                Ok(body) => return Ok(body),
                Err(e) if attempt < MAX_ATTEMPTS => {
                    warn!("Attempt {} failed for {}: {}", attempt, url, e);
                    tokio::time::sleep(Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64))
                        .await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .emulation(Emulation::Chrome131)
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8")
            .header("Accept-Language", "fr-FR,fr;q=0.9,en;q=0.8")
            .header("Accept-Encoding", "gzip, deflate, br")
            .header("Cache-Control", "no-cache")
            .header("Pragma", "no-cache")
            .header("Sec-Ch-Ua", "\"Chromium\";v=\"131\", \"Not_A Brand\";v=\"24\"")
            .header("Sec-Ch-Ua-Mobile", "?0")
            .header("Sec-Ch-Ua-Platform", "\"macOS\"")
            .header("Sec-Fetch-Dest", "document")
            .header("Sec-Fetch-Mode", "navigate")
            .header("Sec-Fetch-Site", "none")
            .header("Sec-Fetch-User", "?1")
            .header("Upgrade-Insecure-Requests", "1")
            .send()
            .await
            .context("Failed to send request")?;

        let status = response.status();
        debug!("Response status: {}", status);

        if status == 503 {
            warn!("Rate limited (503). Consider using a proxy or increasing delay.");
            anyhow::bail!("Rate limited by Dealabs. Try increasing --delay or using a proxy.");
        }

        if !status.is_success() {
            anyhow::bail!("Request failed with status: {}", status);
        }

        response.text().await.context("Failed to read response body")
    }

    /// Adds a random delay to mimic human behavior.
    async fn delay(&self) {
        if self.delay_ms == 0 {
            return;
        }

        let jitter = if self.delay_jitter_ms > 0 {
            rand::rng().random_range(0..=self.delay_jitter_ms)
        } else {
            0
        };

        let total_delay = self.delay_ms + jitter;
        debug!("Delaying {}ms", total_delay);
        tokio::time::sleep(Duration::from_millis(total_delay)).await;
    }
}

#[async_trait]
impl DealSource for DealabsClient {
    async fn search(&self, query: &str) -> Result<String> {
        let url = format!("{}/search?q={}", self.base_url(), urlencoding::encode(query));

        info!("Searching deals: {}", query);
        self.get(&url).await
    }

    async fn thread(&self, path: &str) -> Result<String> {
        let url = if path.starts_with("http") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url(), path)
        };

        info!("Fetching deal thread: {}", url);
        self.get(&url).await
    }
}
