use serde::Serialize;
use std::collections::BTreeMap;

/// Well-known field names a detector can fill.
pub mod fields {
    pub const VERSION: &str = "version";
    pub const STABLE_VERSION: &str = "stable_version";
    pub const UPDATE_TIME: &str = "updatetime";
    pub const URL: &str = "url";
    pub const DESCRIPTION: &str = "description";
    pub const LICENSE: &str = "license";
}

/// Accumulated metadata for one package, keyed by field name.
///
/// A missing key means the field was not found; empty values are never stored.
///
/// # Examples
///
/// ```
/// use depwatch_core::DetectionResult;
///
/// let mut result = DetectionResult::new();
/// result.insert("version", "1.2");
/// result.insert("license", "");
///
/// assert_eq!(result.get("version"), Some("1.2"));
/// assert!(!result.contains("license"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DetectionResult {
    fields: BTreeMap<String, String>,
}

impl DetectionResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Stores `value` under `field`, ignoring empty values.
    ///
    /// Returns `true` if the value was stored.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<String>) -> bool {
        let value = value.into();
        if value.is_empty() {
            return false;
        }
        self.fields.insert(field.into(), value);
        true
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
