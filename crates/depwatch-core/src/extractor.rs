use crate::cache::DocumentCache;
use crate::document::Query;
use crate::error::Result;
use crate::options::{Options, QUERY, URL};
use std::sync::Arc;

/// Evaluates a query against the document at a URL.
///
/// The only component that touches parsed documents: detectors hand it
/// options carrying `url` and `query` and get back matched strings.
#[derive(Clone)]
pub struct Extractor {
    cache: Arc<DocumentCache>,
}

impl Extractor {
    pub fn new(cache: Arc<DocumentCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &Arc<DocumentCache> {
        &self.cache
    }

    /// Returns all values matched by `options["query"]` in the document at
    /// `options["url"]`, in document order. An empty vector means no match.
    ///
    /// # Errors
    ///
    /// - [`MissingOption`](crate::DetectError::MissingOption) if `url` or `query` is absent
    /// - [`InvalidQuery`](crate::DetectError::InvalidQuery) if the query cannot be compiled
    /// - fetch and parse failures from the cache
    pub async fn extract(&self, options: &Options) -> Result<Vec<String>> {
        let url = options.require(URL)?;
        let query: Query = options.require(QUERY)?.parse()?;

        let document = self.cache.get_or_fetch(url).await?;
        let values = document.query(&query);
        tracing::debug!("{} matched {} value(s) at {}", query.as_str(), values.len(), url);

        Ok(values)
    }
}
