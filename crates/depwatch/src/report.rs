//! Detection run and its printable outcome.

use crate::input::ManifestFile;
use depwatch_core::{DetectionResult, Detector, DocumentCache, Extractor, Manifest, detect_fields};
use depwatch_maven::MavenDetector;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// What gets printed for one package.
#[derive(Debug, Serialize)]
pub struct Report {
    pub name: String,
    pub result: DetectionResult,
    /// Field name to error message, for fields that failed.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: BTreeMap<String, String>,
}

impl Report {
    pub fn is_complete(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Resolves `fields` for the package in `input` against its Maven repository.
///
/// # Errors
///
/// Fails only if the HTTP client cannot be built; per-field failures end up
/// in [`Report::errors`].
pub async fn run(input: &ManifestFile, fields: &[&str]) -> depwatch_core::Result<Report> {
    let cache = Arc::new(DocumentCache::with_http(&input.config.fetch)?);
    let detector = MavenDetector::new(&input.manifest, Extractor::new(cache))
        .with_failure_policy(input.config.failure_policy);

    Ok(detect(&detector, &input.manifest, fields).await)
}

/// Runs `detector` over `fields` for `manifest`.
pub async fn detect(detector: &dyn Detector, manifest: &Manifest, fields: &[&str]) -> Report {
    let detection = detect_fields(detector, &manifest.options(), fields).await;

    tracing::info!(
        "{}: detected {} of {} fields",
        manifest.name,
        detection.result.len(),
        fields.len()
    );

    Report {
        name: manifest.name.clone(),
        errors: detection
            .errors
            .into_iter()
            .map(|(field, e)| (field, e.to_string()))
            .collect(),
        result: detection.result,
    }
}
