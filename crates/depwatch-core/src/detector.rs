use crate::config::FailurePolicy;
use crate::error::Result;
use crate::extractor::Extractor;
use crate::options::{Options, QUERY, URL};
use crate::result::DetectionResult;
use async_trait::async_trait;

/// Resolves metadata fields for one package ecosystem.
///
/// Implementors supply the ecosystem-specific parts: a default repository,
/// the field-to-query table and the list of candidate URLs. Candidate
/// iteration and field dispatch are provided, and may be overridden where
/// an ecosystem needs extra handling (e.g. ranking a list of versions).
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use depwatch_core::{DetectionResult, Detector, Extractor, Options, Result};
///
/// struct FixedDetector {
///     extractor: Extractor,
/// }
///
/// #[async_trait]
/// impl Detector for FixedDetector {
///     fn ecosystem(&self) -> &'static str {
///         "fixed"
///     }
///
///     fn extractor(&self) -> &Extractor {
///         &self.extractor
///     }
///
///     fn default_repository(&self) -> &str {
///         "https://repo.example"
///     }
///
///     fn query_for(&self, field: &str) -> Option<&'static str> {
///         (field == "version").then_some("/package/version/text()")
///     }
///
///     fn get_urls(&self, options: &Options, _result: &DetectionResult) -> Result<Vec<String>> {
///         Ok(self
///             .get_repositories(options)
///             .into_iter()
///             .map(|repo| format!("{}/package.xml", repo))
///             .collect())
///     }
/// }
/// ```
#[async_trait]
pub trait Detector: Send + Sync {
    /// Short ecosystem name used in log messages.
    fn ecosystem(&self) -> &'static str;

    fn extractor(&self) -> &Extractor;

    /// Repository used when the options name none.
    fn default_repository(&self) -> &str;

    /// Query expression extracting `field`, or `None` if unsupported.
    fn query_for(&self, field: &str) -> Option<&'static str>;

    /// Candidate metadata URLs, most general first.
    ///
    /// Must be deterministic for identical inputs.
    fn get_urls(&self, options: &Options, result: &DetectionResult) -> Result<Vec<String>>;

    /// How [`resolve`](Self::resolve) treats a candidate that fails to
    /// fetch or parse.
    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Abort
    }

    /// Base repositories to build candidate URLs from.
    fn get_repositories(&self, options: &Options) -> Vec<String> {
        let repository = options
            .repository()
            .unwrap_or_else(|| self.default_repository());
        vec![repository.to_string()]
    }

    /// Returns the values of the first candidate URL whose extraction is
    /// non-empty, or `None` if no candidate matched.
    ///
    /// Under [`FailurePolicy::Abort`] the first fetch or parse failure ends
    /// resolution. Under [`FailurePolicy::TryNext`] failures are logged and
    /// skipped; if nothing matched, the last failure is returned.
    async fn resolve(
        &self,
        options: &Options,
        result: &DetectionResult,
    ) -> Result<Option<Vec<String>>> {
        let mut last_failure = None;

        for url in self.get_urls(options, result)? {
            let candidate = options.with(URL, url.as_str());
            match self.extractor().extract(&candidate).await {
                Ok(values) if !values.is_empty() => return Ok(Some(values)),
                Ok(_) => tracing::debug!("{}: no match at {}", self.ecosystem(), url),
                Err(e)
                    if (e.is_fetch() || e.is_parse())
                        && self.failure_policy() == FailurePolicy::TryNext =>
                {
                    tracing::warn!("{}: skipping candidate {}: {}", self.ecosystem(), url, e);
                    last_failure = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        match last_failure {
            Some(e) => Err(e),
            None => Ok(None),
        }
    }

    /// Detects `field` and stores its first value in `result`.
    ///
    /// Unsupported fields are a no-op; a field that matches nothing leaves
    /// `result` untouched.
    async fn detect(
        &self,
        field: &str,
        options: &Options,
        result: &mut DetectionResult,
    ) -> Result<()> {
        match self.query_for(field) {
            Some(query) => self.detect_with_query(field, query, options, result).await,
            None => {
                tracing::debug!("{}: unsupported field '{}'", self.ecosystem(), field);
                Ok(())
            }
        }
    }

    /// Resolves `query` and stores the first matched value under `field`.
    async fn detect_with_query(
        &self,
        field: &str,
        query: &str,
        options: &Options,
        result: &mut DetectionResult,
    ) -> Result<()> {
        let options = options.with(QUERY, query);
        if let Some(value) = self
            .resolve(&options, result)
            .await?
            .and_then(|values| values.into_iter().next())
        {
            result.insert(field, value);
        }
        Ok(())
    }
}
