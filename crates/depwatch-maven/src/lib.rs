//! Maven repository support for depwatch.
//!
//! Resolves `group:artifact` aliases against a Maven-layout repository
//! (Maven Central by default). Versions come from `maven-metadata.xml` and
//! are ranked with Maven's own ordering; project URL, description and
//! license come from the POM of the detected version.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use depwatch_core::{DEFAULT_FIELDS, DocumentCache, Extractor, FetchConfig, Manifest, detect_fields};
//! use depwatch_maven::MavenDetector;
//!
//! # async fn example() -> depwatch_core::Result<()> {
//! let cache = Arc::new(DocumentCache::with_http(&FetchConfig::default())?);
//! let manifest = Manifest::new("guava", ["com.google.guava:guava"]);
//! let detector = MavenDetector::new(&manifest, Extractor::new(cache));
//!
//! let detection = detect_fields(&detector, &manifest.options(), DEFAULT_FIELDS).await;
//! println!("{:?}", detection.result.get("version"));
//! # Ok(())
//! # }
//! ```

pub mod coordinate;
pub mod detector;
pub mod version;

pub use coordinate::{Coordinate, find_coordinate};
pub use detector::{DEFAULT_REPOSITORY, FIELD_QUERIES, MavenDetector, VERSIONS_QUERY};
pub use version::{MavenVersion, MavenVersionRanker};
