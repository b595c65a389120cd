//! Maven repository detector.
//!
//! Candidate documents for a coordinate `group:artifact` in repository `R`:
//!
//! 1. `R/group/path/artifact/maven-metadata.xml`, the version index
//! 2. `R/group/path/artifact/V/artifact-V.pom`, the project descriptor,
//!    once a version `V` has been detected
//!
//! Project fields (`url`, `description`, `license`) only exist in the POM,
//! so `version` has to be detected before them.

use crate::coordinate::{Coordinate, find_coordinate};
use crate::version::MavenVersionRanker;
use async_trait::async_trait;
use depwatch_core::options::QUERY;
use depwatch_core::{
    DetectionResult, Detector, Extractor, FailurePolicy, Manifest, Options, Result, VersionRanker,
    fields,
};
use std::sync::Arc;

/// Maven Central.
pub const DEFAULT_REPOSITORY: &str = "https://repo1.maven.org/maven2";

/// Every published version in the metadata index.
pub const VERSIONS_QUERY: &str = "/metadata/versioning/versions/version/text()";

/// Field-to-query table for metadata and POM documents.
pub const FIELD_QUERIES: &[(&str, &str)] = &[
    (
        fields::VERSION,
        "/metadata/versioning/release/text()|/metadata/version/text()",
    ),
    (fields::UPDATE_TIME, "/metadata/versioning/lastUpdated/text()"),
    (fields::URL, "/project/url/text()"),
    (fields::DESCRIPTION, "/project/description/text()"),
    (fields::LICENSE, "/project/licenses/license/name/text()"),
];

/// Detector for Maven-layout repositories.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use depwatch_core::{DetectionResult, Detector, DocumentCache, Extractor, Manifest, MemoryFetcher, Options};
/// use depwatch_maven::MavenDetector;
///
/// let cache = Arc::new(DocumentCache::new(Arc::new(MemoryFetcher::new())));
/// let manifest = Manifest::new("mylib", ["org.example:mylib"]);
/// let detector = MavenDetector::new(&manifest, Extractor::new(cache));
///
/// let mut result = DetectionResult::new();
/// let urls = detector.get_urls(&Options::new(), &result).unwrap();
/// assert_eq!(urls, vec!["https://repo1.maven.org/maven2/org/example/mylib/maven-metadata.xml"]);
///
/// result.insert("version", "1.2");
/// let urls = detector.get_urls(&Options::new(), &result).unwrap();
/// assert_eq!(urls[1], "https://repo1.maven.org/maven2/org/example/mylib/1.2/mylib-1.2.pom");
/// ```
pub struct MavenDetector {
    aliases: Vec<String>,
    extractor: Extractor,
    ranker: Arc<dyn VersionRanker>,
    failure_policy: FailurePolicy,
}

impl MavenDetector {
    /// Creates a detector for `manifest` using Maven version ordering and
    /// the default failure policy.
    pub fn new(manifest: &Manifest, extractor: Extractor) -> Self {
        Self {
            aliases: manifest.aliases.clone(),
            extractor,
            ranker: Arc::new(MavenVersionRanker),
            failure_policy: FailurePolicy::default(),
        }
    }

    #[must_use]
    pub fn with_ranker(mut self, ranker: Arc<dyn VersionRanker>) -> Self {
        self.ranker = ranker;
        self
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// The coordinate this detector resolves.
    ///
    /// # Errors
    ///
    /// Returns [`DetectError::AliasFormat`](depwatch_core::DetectError::AliasFormat)
    /// if no alias has the `group:artifact` shape.
    pub fn coordinate(&self) -> Result<Coordinate> {
        find_coordinate(&self.aliases)
    }

    /// Collects every published version and lets the ranker pick one.
    async fn rank_versions(
        &self,
        field: &str,
        options: &Options,
        result: &DetectionResult,
    ) -> Result<Option<String>> {
        let options = options.with(QUERY, VERSIONS_QUERY);
        let versions = self.resolve(&options, result).await?.unwrap_or_default();

        let picked = if field == fields::STABLE_VERSION {
            self.ranker.stable(&versions)
        } else {
            self.ranker.latest(&versions)
        };
        tracing::debug!(
            "maven: {} of {} published versions: {:?}",
            field,
            versions.len(),
            picked
        );
        Ok(picked)
    }
}

#[async_trait]
impl Detector for MavenDetector {
    fn ecosystem(&self) -> &'static str {
        "maven"
    }

    fn extractor(&self) -> &Extractor {
        &self.extractor
    }

    fn default_repository(&self) -> &str {
        DEFAULT_REPOSITORY
    }

    fn query_for(&self, field: &str) -> Option<&'static str> {
        FIELD_QUERIES
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, query)| *query)
    }

    fn get_urls(&self, options: &Options, result: &DetectionResult) -> Result<Vec<String>> {
        let coordinate = self.coordinate()?;
        let path = coordinate.path();
        let version = result.get(fields::VERSION);

        let mut urls = Vec::new();
        for repository in self.get_repositories(options) {
            let base = format!("{}/{}", repository.trim_end_matches('/'), path);
            urls.push(format!("{}/maven-metadata.xml", base));
            if let Some(version) = version {
                urls.push(format!(
                    "{}/{}/{}-{}.pom",
                    base, version, coordinate.artifact, version
                ));
            }
        }
        Ok(urls)
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    async fn detect(
        &self,
        field: &str,
        options: &Options,
        result: &mut DetectionResult,
    ) -> Result<()> {
        if (field == fields::VERSION || field == fields::STABLE_VERSION)
            && let Some(version) = self.rank_versions(field, options, result).await?
        {
            result.insert(field, version);
            return Ok(());
        }

        match self.query_for(field) {
            Some(query) => self.detect_with_query(field, query, options, result).await,
            None => {
                tracing::debug!("maven: unsupported field '{}'", field);
                Ok(())
            }
        }
    }
}
