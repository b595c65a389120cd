//! Transport for metadata documents.

use crate::config::FetchConfig;
use crate::error::{DetectError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use reqwest::Client;
use std::collections::HashMap;
use std::time::Duration;

/// Retrieves raw document bodies.
///
/// [`HttpFetcher`] is the production implementation; anything else (a local
/// mirror, a fixture store) can be plugged into a
/// [`DocumentCache`](crate::cache::DocumentCache) the same way.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches the body at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::Fetch`] on network failure and
    /// [`DetectError::HttpStatus`] on a non-success status.
    async fn fetch(&self, url: &str) -> Result<Bytes>;
}

/// HTTP fetcher backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Builds a fetcher with the configured user agent and timeout.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(DetectError::Client)?;

        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        tracing::debug!("fetching {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DetectError::Fetch {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!("repository returned status {}: {}", status, url);
            return Err(DetectError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.bytes().await.map_err(|e| DetectError::Fetch {
            url: url.to_string(),
            source: e,
        })
    }
}

/// Serves bodies from memory.
///
/// Useful for offline fixtures: unknown URLs answer with a 404 status,
/// and every request is counted per URL.
///
/// # Examples
///
/// ```
/// use depwatch_core::fetch::{Fetcher, MemoryFetcher};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let fetcher = MemoryFetcher::new().with_document("https://r.example/a.xml", "<a/>");
///
/// assert!(fetcher.fetch("https://r.example/a.xml").await.is_ok());
/// assert!(fetcher.fetch("https://r.example/b.xml").await.is_err());
/// assert_eq!(fetcher.fetch_count("https://r.example/a.xml"), 1);
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryFetcher {
    documents: HashMap<String, Bytes>,
    calls: DashMap<String, usize>,
}

impl MemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_document(mut self, url: impl Into<String>, body: impl Into<Bytes>) -> Self {
        self.documents.insert(url.into(), body.into());
        self
    }

    /// Number of times `url` was requested, found or not.
    pub fn fetch_count(&self, url: &str) -> usize {
        self.calls.get(url).map_or(0, |count| *count)
    }
}

#[async_trait]
impl Fetcher for MemoryFetcher {
    async fn fetch(&self, url: &str) -> Result<Bytes> {
        *self.calls.entry(url.to_string()).or_insert(0) += 1;
        self.documents
            .get(url)
            .cloned()
            .ok_or_else(|| DetectError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}
