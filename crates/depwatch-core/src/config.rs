use serde::Deserialize;

/// Root configuration for a detection run.
///
/// All fields fall back to defaults when not specified.
///
/// # Examples
///
/// ```
/// use depwatch_core::config::{DepwatchConfig, FailurePolicy};
///
/// let json = r#"{
///     "fetch": { "timeout_secs": 10 },
///     "failure_policy": "try_next"
/// }"#;
///
/// let config: DepwatchConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.fetch.timeout_secs, 10);
/// assert_eq!(config.failure_policy, FailurePolicy::TryNext);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepwatchConfig {
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
}

/// HTTP transport settings.
///
/// # Defaults
///
/// - `user_agent`: `"depwatch/<crate version>"`
/// - `timeout_secs`: `30`
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// What a detector does when fetching or parsing a candidate URL fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Stop resolving the field and report the failure.
    #[default]
    Abort,
    /// Log the failure and move on to the next candidate URL.
    TryNext,
}

fn default_user_agent() -> String {
    format!("depwatch/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout_secs() -> u64 {
    30
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DepwatchConfig::default();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.fetch.user_agent.starts_with("depwatch/"));
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: DepwatchConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.fetch.timeout_secs, 30);
        assert_eq!(config.failure_policy, FailurePolicy::Abort);
    }

    #[test]
    fn test_partial_fetch_config() {
        let config: FetchConfig = serde_json::from_str(r#"{"user_agent": "ci"}"#).unwrap();
        assert_eq!(config.user_agent, "ci");
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn test_failure_policy_names() {
        let abort: FailurePolicy = serde_json::from_str(r#""abort""#).unwrap();
        let next: FailurePolicy = serde_json::from_str(r#""try_next""#).unwrap();
        assert_eq!(abort, FailurePolicy::Abort);
        assert_eq!(next, FailurePolicy::TryNext);
        assert!(serde_json::from_str::<FailurePolicy>(r#""retry""#).is_err());
    }
}
