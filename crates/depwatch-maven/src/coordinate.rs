//! Maven `group:artifact` aliases.

use depwatch_core::{DetectError, Result};
use std::fmt;

/// A Maven coordinate without a version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub group: String,
    pub artifact: String,
}

impl Coordinate {
    /// Parses `group:artifact`.
    ///
    /// Returns `None` unless the alias has exactly two non-empty
    /// `:`-separated parts.
    ///
    /// # Examples
    ///
    /// ```
    /// use depwatch_maven::Coordinate;
    ///
    /// let coord = Coordinate::parse("org.apache.commons:commons-lang3").unwrap();
    /// assert_eq!(coord.path(), "org/apache/commons/commons-lang3");
    ///
    /// assert!(Coordinate::parse("commons-lang3").is_none());
    /// assert!(Coordinate::parse("org.apache:commons:3.0").is_none());
    /// ```
    pub fn parse(alias: &str) -> Option<Self> {
        let mut parts = alias.trim().split(':');
        let group = parts.next()?.trim();
        let artifact = parts.next()?.trim();
        if parts.next().is_some() || group.is_empty() || artifact.is_empty() {
            return None;
        }

        Some(Self {
            group: group.to_string(),
            artifact: artifact.to_string(),
        })
    }

    /// Repository path of the artifact directory: `org/example/mylib`.
    pub fn path(&self) -> String {
        format!("{}/{}", self.group.replace('.', "/"), self.artifact)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// First alias that parses as a coordinate.
///
/// # Errors
///
/// Returns [`DetectError::AliasFormat`] if none does.
pub fn find_coordinate(aliases: &[String]) -> Result<Coordinate> {
    aliases
        .iter()
        .find_map(|alias| Coordinate::parse(alias))
        .ok_or_else(|| DetectError::AliasFormat {
            aliases: aliases.to_vec(),
        })
}
