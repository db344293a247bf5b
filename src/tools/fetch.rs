//! Page fetching over HTTP
//!
//! The fetcher only retrieves raw HTML; extraction happens in
//! [`crate::research::scrape`]. Timeouts and other failures are reported as
//! distinct error variants so the scraper can classify them.

use crate::types::{AppError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Raw page as returned by a fetcher
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedPage {
    pub status_code: u16,
    pub body: String,
}

#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch `url`. Fails with [`AppError::FetchTimeout`] when `timeout`
    /// elapses and [`AppError::Fetch`] for every other failure, including
    /// non-2xx responses.
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage>;
}

/// reqwest-based fetcher that presents a desktop browser User-Agent
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

fn classify(url: &str, err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::FetchTimeout(format!("{} did not respond in time", url))
    } else {
        AppError::Fetch(format!("Cannot reach {}: {}", url, err))
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str, timeout: Duration) -> Result<FetchedPage> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Fetch(format!("{} returned HTTP {}", url, status)));
        }

        // The timeout covers the body as well
        let body = response.text().await.map_err(|e| classify(url, e))?;

        Ok(FetchedPage {
            status_code: status.as_u16(),
            body,
        })
    }
}
