use crate::document::MalformedDocument;
use thiserror::Error;

/// Errors raised while detecting package metadata.
///
/// Fetch and parse failures carry the URL they happened on so a caller
/// reporting per-field errors can tell which candidate broke.
///
/// # Examples
///
/// ```
/// use depwatch_core::error::DetectError;
///
/// let error = DetectError::AliasFormat {
///     aliases: vec!["not-a-coordinate".into()],
/// };
/// assert!(error.to_string().contains("not-a-coordinate"));
/// assert!(!error.is_fetch());
/// ```
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("no alias in group:artifact form among {aliases:?}")]
    AliasFormat { aliases: Vec<String> },

    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("failed to parse document at {url}: {source}")]
    Parse {
        url: String,
        #[source]
        source: MalformedDocument,
    },

    #[error("invalid query expression '{expression}': {reason}")]
    InvalidQuery { expression: String, reason: String },

    #[error("missing option: {0}")]
    MissingOption(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl DetectError {
    /// Returns `true` for transport failures, including non-success statuses.
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::HttpStatus { .. })
    }

    /// Returns `true` if the fetched document could not be parsed.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub(crate) fn invalid_query(expression: &str, reason: impl Into<String>) -> Self {
        Self::InvalidQuery {
            expression: expression.to_string(),
            reason: reason.into(),
        }
    }
}

/// Convenience type alias for `Result<T, DetectError>`.
pub type Result<T> = std::result::Result<T, DetectError>;
