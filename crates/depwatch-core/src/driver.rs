//! Runs a detector over a list of fields for one package.

use crate::detector::Detector;
use crate::error::DetectError;
use crate::options::Options;
use crate::result::{DetectionResult, fields};

/// Every field the built-in detectors know about, in detection order.
pub const DEFAULT_FIELDS: &[&str] = &[
    fields::VERSION,
    fields::STABLE_VERSION,
    fields::UPDATE_TIME,
    fields::URL,
    fields::DESCRIPTION,
    fields::LICENSE,
];

/// Outcome of [`detect_fields`]: whatever was found, plus per-field errors.
#[derive(Debug, Default)]
pub struct Detection {
    pub result: DetectionResult,
    pub errors: Vec<(String, DetectError)>,
}

impl Detection {
    /// Returns `true` if no field failed.
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Detects each of `requested`, one `detect` call per field.
///
/// `version` always goes first so per-version documents are reachable for
/// the fields that live there. A failing field is logged and recorded
/// without stopping the others, except for an alias-format error, which
/// makes every field unreachable and ends the run.
pub async fn detect_fields(
    detector: &dyn Detector,
    options: &Options,
    requested: &[&str],
) -> Detection {
    let mut detection = Detection::default();

    let ordered = requested
        .iter()
        .filter(|field| **field == fields::VERSION)
        .chain(requested.iter().filter(|field| **field != fields::VERSION));

    for field in ordered {
        if let Err(e) = detector.detect(field, options, &mut detection.result).await {
            tracing::warn!("{}: failed to detect {}: {}", detector.ecosystem(), field, e);
            let fatal = matches!(e, DetectError::AliasFormat { .. });
            detection.errors.push(((*field).to_string(), e));
            if fatal {
                break;
            }
        }
    }

    detection
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::extractor::Extractor;
    use crate::{DocumentCache, MemoryFetcher};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::sync::Mutex;

    /// Records the order of `detect` calls and fails on request.
    struct RecordingDetector {
        extractor: Extractor,
        calls: Mutex<Vec<String>>,
        failing: Option<&'static str>,
        alias_error: bool,
    }

    impl RecordingDetector {
        fn new() -> Self {
            Self {
                extractor: Extractor::new(Arc::new(DocumentCache::new(Arc::new(
                    MemoryFetcher::new(),
                )))),
                calls: Mutex::new(Vec::new()),
                failing: None,
                alias_error: false,
            }
        }
    }

    #[async_trait]
    impl Detector for RecordingDetector {
        fn ecosystem(&self) -> &'static str {
            "recording"
        }

        fn extractor(&self) -> &Extractor {
            &self.extractor
        }

        fn default_repository(&self) -> &str {
            "https://repo.example"
        }

        fn query_for(&self, _field: &str) -> Option<&'static str> {
            None
        }

        fn get_urls(&self, _options: &Options, _result: &DetectionResult) -> Result<Vec<String>> {
            Ok(vec![])
        }

        async fn detect(
            &self,
            field: &str,
            _options: &Options,
            result: &mut DetectionResult,
        ) -> Result<()> {
            self.calls.lock().unwrap().push(field.to_string());
            if self.alias_error {
                return Err(DetectError::AliasFormat { aliases: vec![] });
            }
            if self.failing == Some(field) {
                return Err(DetectError::HttpStatus {
                    url: "https://repo.example/x".into(),
                    status: 500,
                });
            }
            result.insert(field, format!("{field}-value"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_version_is_detected_first() {
        let detector = RecordingDetector::new();
        let detection =
            detect_fields(&detector, &Options::new(), &["url", "license", "version"]).await;

        assert_eq!(
            *detector.calls.lock().unwrap(),
            vec!["version", "url", "license"]
        );
        assert!(detection.is_complete());
        assert_eq!(detection.result.len(), 3);
    }

    #[tokio::test]
    async fn test_failing_field_does_not_block_others() {
        let mut detector = RecordingDetector::new();
        detector.failing = Some("description");

        let detection = detect_fields(&detector, &Options::new(), DEFAULT_FIELDS).await;

        assert_eq!(detection.errors.len(), 1);
        assert_eq!(detection.errors[0].0, "description");
        assert!(!detection.result.contains("description"));
        assert_eq!(detection.result.len(), DEFAULT_FIELDS.len() - 1);
    }

    #[tokio::test]
    async fn test_alias_error_stops_run() {
        let mut detector = RecordingDetector::new();
        detector.alias_error = true;

        let detection = detect_fields(&detector, &Options::new(), DEFAULT_FIELDS).await;

        assert_eq!(detection.errors.len(), 1);
        assert_eq!(detector.calls.lock().unwrap().len(), 1);
        assert!(detection.result.is_empty());
    }
}
