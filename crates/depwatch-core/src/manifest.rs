use crate::options::Options;
use serde::Deserialize;
use std::collections::BTreeMap;

/// A package to watch.
///
/// Aliases name the package in each ecosystem's own scheme, e.g.
/// `org.example:mylib` for a Maven coordinate. `options` seeds the
/// [`Options`] handed to detectors, usually just `repository`.
///
/// # Examples
///
/// ```
/// use depwatch_core::Manifest;
///
/// let json = r#"{
///     "name": "mylib",
///     "aliases": ["org.example:mylib"],
///     "options": { "repository": "https://repo.example/maven2" }
/// }"#;
///
/// let manifest: Manifest = serde_json::from_str(json).unwrap();
/// assert_eq!(manifest.aliases, vec!["org.example:mylib"]);
/// assert_eq!(manifest.options().repository(), Some("https://repo.example/maven2"));
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct Manifest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub options: BTreeMap<String, String>,
}

impl Manifest {
    pub fn new(name: impl Into<String>, aliases: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            aliases: aliases.into_iter().map(Into::into).collect(),
            options: BTreeMap::new(),
        }
    }

    /// Builds the caller-level options for this package.
    pub fn options(&self) -> Options {
        self.options
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_defaults() {
        let manifest: Manifest = serde_json::from_str(r#"{"name": "x"}"#).unwrap();
        assert!(manifest.aliases.is_empty());
        assert!(manifest.options().is_empty());
    }

    #[test]
    fn test_manifest_new() {
        let manifest = Manifest::new("mylib", ["org.example:mylib", "mylib"]);
        assert_eq!(manifest.name, "mylib");
        assert_eq!(manifest.aliases.len(), 2);
    }
}
