//! Core abstractions for depwatch.
//!
//! depwatch finds the latest published version of a package, along with its
//! project URL, description, license and last update time, by querying a
//! repository's metadata documents.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌───────────────┐     ┌─────────────┐
//! │  Detector   │────▶│  Extractor  │────▶│ DocumentCache │────▶│   Fetcher   │
//! │ (ecosystem) │     │  (queries)  │     │  (per URL)    │     │ (transport) │
//! └─────────────┘     └─────────────┘     └───────────────┘     └─────────────┘
//!        │
//!        ▼
//! ┌─────────────┐
//! │VersionRanker│
//! └─────────────┘
//! ```
//!
//! A [`Detector`] turns a package into candidate metadata URLs and resolves
//! one field at a time into a shared [`DetectionResult`]. Ecosystem crates
//! (such as `depwatch-maven`) implement it; [`detect_fields`] drives a
//! detector over a list of fields.

pub mod cache;
pub mod config;
pub mod detector;
pub mod document;
pub mod driver;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod manifest;
pub mod options;
pub mod ranking;
pub mod result;

// Re-export commonly used types
pub use cache::DocumentCache;
pub use config::{DepwatchConfig, FailurePolicy, FetchConfig};
pub use detector::Detector;
pub use document::{Document, Query};
pub use driver::{DEFAULT_FIELDS, Detection, detect_fields};
pub use error::{DetectError, Result};
pub use extractor::Extractor;
pub use fetch::{Fetcher, HttpFetcher, MemoryFetcher};
pub use manifest::Manifest;
pub use options::Options;
pub use ranking::{SemverRanker, VersionRanker};
pub use result::{DetectionResult, fields};
