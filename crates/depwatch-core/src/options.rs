//! Immutable detection options.
//!
//! Each resolution step derives a new [`Options`] from its caller's with
//! [`Options::with`]; nothing downstream can alter the caller's copy.

use crate::error::{DetectError, Result};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Base repository URL, supplied by the caller.
pub const REPOSITORY: &str = "repository";

/// Fetch target, set while iterating candidate URLs.
pub const URL: &str = "url";

/// Query expression, set per field.
pub const QUERY: &str = "query";

/// String-keyed configuration handed down through a detector.
///
/// Cloning is cheap: entries live behind an `Arc` and are only copied
/// when [`with`](Self::with) extends them.
///
/// # Examples
///
/// ```
/// use depwatch_core::Options;
///
/// let base = Options::new().with("repository", "https://repo.example/maven2");
/// let derived = base.with("url", "https://repo.example/maven2/a/b/maven-metadata.xml");
///
/// assert_eq!(base.url(), None);
/// assert_eq!(derived.repository(), Some("https://repo.example/maven2"));
/// assert!(derived.url().is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    entries: Arc<BTreeMap<String, String>>,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of these options with `key` set to `value`.
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut entries = (*self.entries).clone();
        entries.insert(key.into(), value.into());
        Self {
            entries: Arc::new(entries),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Like [`get`](Self::get), but a missing key is an error.
    pub fn require(&self, key: &'static str) -> Result<&str> {
        self.get(key).ok_or(DetectError::MissingOption(key))
    }

    pub fn repository(&self) -> Option<&str> {
        self.get(REPOSITORY)
    }

    pub fn url(&self) -> Option<&str> {
        self.get(URL)
    }

    pub fn query(&self) -> Option<&str> {
        self.get(QUERY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K, V> FromIterator<(K, V)> for Options
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: Arc::new(
                iter.into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_leaves_original_untouched() {
        let original = Options::new().with(REPOSITORY, "https://a.example");
        let extended = original.with(URL, "https://a.example/x.xml");

        assert_eq!(original.len(), 1);
        assert_eq!(original.url(), None);
        assert_eq!(extended.len(), 2);
        assert_eq!(extended.url(), Some("https://a.example/x.xml"));
        assert_eq!(extended.repository(), Some("https://a.example"));
    }

    #[test]
    fn test_with_overrides_existing_key() {
        let first = Options::new().with(QUERY, "/a/text()");
        let second = first.with(QUERY, "/b/text()");

        assert_eq!(first.query(), Some("/a/text()"));
        assert_eq!(second.query(), Some("/b/text()"));
        assert_eq!(second.len(), 1);
    }

    #[test]
    fn test_require_missing_key() {
        let options = Options::new();
        let err = options.require(URL).unwrap_err();
        assert!(matches!(err, DetectError::MissingOption("url")));
    }

    #[test]
    fn test_from_iterator() {
        let options: Options = [("repository", "https://r.example"), ("extra", "1")]
            .into_iter()
            .collect();

        assert_eq!(options.repository(), Some("https://r.example"));
        assert_eq!(options.get("extra"), Some("1"));
        assert_eq!(options.iter().count(), 2);
    }

    #[test]
    fn test_empty_options() {
        let options = Options::new();
        assert!(options.is_empty());
        assert_eq!(options.repository(), None);
        assert_eq!(options.query(), None);
    }
}
