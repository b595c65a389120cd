use crate::config::FetchConfig;
use crate::document::Document;
use crate::error::{DetectError, Result};
use crate::fetch::{Fetcher, HttpFetcher};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Parsed-document cache keyed by URL.
///
/// Repository metadata is treated as immutable for the lifetime of the
/// cache, so entries are never revalidated or evicted. Each URL owns a
/// once-cell: concurrent callers asking for the same URL share a single
/// fetch, and a failed fetch or parse leaves the slot empty so the next
/// call tries again.
///
/// # Examples
///
/// ```no_run
/// use depwatch_core::cache::DocumentCache;
/// use depwatch_core::config::FetchConfig;
///
/// # async fn example() -> depwatch_core::error::Result<()> {
/// let cache = DocumentCache::with_http(&FetchConfig::default())?;
/// let url = "https://repo1.maven.org/maven2/junit/junit/maven-metadata.xml";
///
/// let first = cache.get_or_fetch(url).await?;
/// let second = cache.get_or_fetch(url).await?;
///
/// // Second lookup is served from memory
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// # Ok(())
/// # }
/// ```
pub struct DocumentCache {
    entries: DashMap<String, Arc<OnceCell<Arc<Document>>>>,
    fetcher: Arc<dyn Fetcher>,
}

impl DocumentCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            entries: DashMap::new(),
            fetcher,
        }
    }

    /// Creates a cache backed by an [`HttpFetcher`].
    pub fn with_http(config: &FetchConfig) -> Result<Self> {
        Ok(Self::new(Arc::new(HttpFetcher::new(config)?)))
    }

    /// Returns the parsed document at `url`, fetching it on first use.
    ///
    /// # Errors
    ///
    /// Propagates fetch failures from the [`Fetcher`] and returns
    /// [`DetectError::Parse`] if the body is not a well-formed document.
    /// Failures are not cached.
    pub async fn get_or_fetch(&self, url: &str) -> Result<Arc<Document>> {
        // The map guard must not be held across the fetch.
        let cell = {
            let entry = self.entries.entry(url.to_string()).or_default();
            Arc::clone(entry.value())
        };

        if let Some(document) = cell.get() {
            tracing::debug!("document cache hit: {}", url);
            return Ok(Arc::clone(document));
        }

        match cell.get_or_try_init(|| self.load(url)).await {
            Ok(document) => Ok(Arc::clone(document)),
            Err(e) => {
                // Forget the empty slot so failing URLs do not accumulate.
                self.entries
                    .remove_if(url, |_, slot| Arc::ptr_eq(slot, &cell) && !slot.initialized());
                Err(e)
            }
        }
    }

    async fn load(&self, url: &str) -> Result<Arc<Document>> {
        let body = self.fetcher.fetch(url).await?;
        let document = Document::parse(&body).map_err(|source| DetectError::Parse {
            url: url.to_string(),
            source,
        })?;
        tracing::debug!("cached document <{}> from {}", document.root_name(), url);
        Ok(Arc::new(document))
    }

    /// Returns `true` if a parsed document for `url` is cached.
    pub fn contains(&self, url: &str) -> bool {
        self.entries
            .get(url)
            .is_some_and(|cell| cell.initialized())
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops every cached document.
    pub fn clear(&self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingFetcher {
        body: &'static str,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for CountingFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Bytes::from_static(self.body.as_bytes()))
        }
    }

    fn http_cache() -> DocumentCache {
        DocumentCache::with_http(&FetchConfig::default()).unwrap()
    }

    #[test]
    fn test_cache_creation() {
        let cache = http_cache();
        assert_eq!(cache.len(), 0);
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_repeated_url_fetched_once() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/a/b/maven-metadata.xml")
            .with_status(200)
            .with_body("<metadata><version>1.0</version></metadata>")
            .expect(1)
            .create_async()
            .await;

        let cache = http_cache();
        let url = format!("{}/a/b/maven-metadata.xml", server.url());

        let first = cache.get_or_fetch(&url).await.unwrap();
        let second = cache.get_or_fetch(&url).await.unwrap();

        mock.assert_async().await;
        assert!(Arc::ptr_eq(&first, &second));
        assert!(cache.contains(&url));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let fetcher = Arc::new(CountingFetcher {
            body: "<metadata/>",
            calls: AtomicUsize::new(0),
        });
        let cache = DocumentCache::new(Arc::clone(&fetcher) as Arc<dyn Fetcher>);

        let (a, b) = tokio::join!(
            cache.get_or_fetch("https://r.example/x.xml"),
            cache.get_or_fetch("https://r.example/x.xml"),
        );

        assert!(Arc::ptr_eq(&a.unwrap(), &b.unwrap()));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_distinct_urls_fetched_separately() {
        let fetcher = Arc::new(CountingFetcher {
            body: "<metadata/>",
            calls: AtomicUsize::new(0),
        });
        let cache = DocumentCache::new(Arc::clone(&fetcher) as Arc<dyn Fetcher>);

        cache.get_or_fetch("https://r.example/1.xml").await.unwrap();
        cache.get_or_fetch("https://r.example/2.xml").await.unwrap();
        cache.get_or_fetch("https://r.example/1.xml").await.unwrap();

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_not_cached() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/flaky.xml", server.url());
        let cache = http_cache();

        let m1 = server
            .mock("GET", "/flaky.xml")
            .with_status(503)
            .create_async()
            .await;

        let err = cache.get_or_fetch(&url).await.unwrap_err();
        assert!(matches!(err, DetectError::HttpStatus { status: 503, .. }));
        assert!(!cache.contains(&url));
        assert!(cache.is_empty());
        assert!(cache.entries.is_empty());

        drop(m1);

        let _m2 = server
            .mock("GET", "/flaky.xml")
            .with_status(200)
            .with_body("<metadata/>")
            .create_async()
            .await;

        let document = cache.get_or_fetch(&url).await.unwrap();
        assert_eq!(document.root_name(), "metadata");
        assert!(cache.contains(&url));
    }

    #[tokio::test]
    async fn test_parse_failure_reports_url() {
        let fetcher = Arc::new(CountingFetcher {
            body: "<metadata><versioning></metadata>",
            calls: AtomicUsize::new(0),
        });
        let cache = DocumentCache::new(fetcher);

        let err = cache
            .get_or_fetch("https://r.example/broken.xml")
            .await
            .unwrap_err();

        match err {
            DetectError::Parse { url, .. } => assert_eq!(url, "https://r.example/broken.xml"),
            other => panic!("Expected Parse, got {other:?}"),
        }
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_failing_urls_leave_no_entries() {
        let cache = DocumentCache::new(Arc::new(crate::fetch::MemoryFetcher::new()));

        for i in 0..5 {
            let url = format!("https://r.example/missing-{i}.xml");
            assert!(cache.get_or_fetch(&url).await.is_err());
            assert!(cache.get_or_fetch(&url).await.is_err());
        }

        assert!(cache.entries.is_empty());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_cache_clear() {
        let fetcher = Arc::new(CountingFetcher {
            body: "<metadata/>",
            calls: AtomicUsize::new(0),
        });
        let cache = DocumentCache::new(Arc::clone(&fetcher) as Arc<dyn Fetcher>);

        cache.get_or_fetch("https://r.example/x.xml").await.unwrap();
        assert_eq!(cache.len(), 1);
        cache.clear();
        assert!(cache.is_empty());

        cache.get_or_fetch("https://r.example/x.xml").await.unwrap();
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 2);
    }
}
