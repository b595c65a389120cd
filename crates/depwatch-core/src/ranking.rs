//! Version ranking policies.
//!
//! A detector collects every published version string and asks a
//! [`VersionRanker`] to pick one. Ordering rules differ per ecosystem, so
//! each detector is constructed with the ranker that fits its repository.

use semver::Version;

/// Picks the newest version from a list of version strings.
pub trait VersionRanker: Send + Sync {
    /// Newest version, pre-releases included.
    ///
    /// Returns `None` if `versions` holds nothing the ranker understands.
    fn latest(&self, versions: &[String]) -> Option<String>;

    /// Newest version that is not a pre-release or snapshot.
    fn stable(&self, versions: &[String]) -> Option<String>;
}

/// Semantic-versioning ranker.
///
/// Partial versions (`1`, `1.2`) are padded with zeros and a leading `v` is
/// accepted. Strings that still do not parse are ignored.
///
/// # Examples
///
/// ```
/// use depwatch_core::ranking::{SemverRanker, VersionRanker};
///
/// let versions: Vec<String> = ["1.0.0", "1.2", "2.0.0-beta.1"]
///     .iter()
///     .map(|s| s.to_string())
///     .collect();
///
/// assert_eq!(SemverRanker.latest(&versions).as_deref(), Some("2.0.0-beta.1"));
/// assert_eq!(SemverRanker.stable(&versions).as_deref(), Some("1.2"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SemverRanker;

impl SemverRanker {
    fn parse(version: &str) -> Option<Version> {
        let trimmed = version.trim();
        let trimmed = trimmed.strip_prefix('v').unwrap_or(trimmed);
        // Only pad the numeric core; pre-release and build metadata stay put.
        let split = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
        let (core, suffix) = trimmed.split_at(split);
        let normalized = match core.split('.').count() {
            1 => format!("{}.0.0{}", core, suffix),
            2 => format!("{}.0{}", core, suffix),
            _ => trimmed.to_string(),
        };
        Version::parse(&normalized).ok()
    }

    fn max_by<F>(versions: &[String], keep: F) -> Option<String>
    where
        F: Fn(&Version) -> bool,
    {
        versions
            .iter()
            .filter_map(|raw| Self::parse(raw).map(|parsed| (parsed, raw)))
            .filter(|(parsed, _)| keep(parsed))
            .max_by(|(a, _), (b, _)| a.cmp(b))
            .map(|(_, raw)| raw.clone())
    }
}

impl VersionRanker for SemverRanker {
    fn latest(&self, versions: &[String]) -> Option<String> {
        Self::max_by(versions, |_| true)
    }

    fn stable(&self, versions: &[String]) -> Option<String> {
        Self::max_by(versions, |v| v.pre.is_empty())
    }
}
