use depwatch_core::{DepwatchConfig, Manifest};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Contents of a manifest file: the package plus optional run settings.
///
/// # Examples
///
/// ```
/// use depwatch::ManifestFile;
/// use depwatch_core::FailurePolicy;
///
/// let json = r#"{
///     "name": "guava",
///     "aliases": ["com.google.guava:guava"],
///     "config": { "failure_policy": "try_next" }
/// }"#;
///
/// let file: ManifestFile = serde_json::from_str(json).unwrap();
/// assert_eq!(file.manifest.name, "guava");
/// assert_eq!(file.config.failure_policy, FailurePolicy::TryNext);
/// ```
#[derive(Debug, Deserialize)]
pub struct ManifestFile {
    #[serde(flatten)]
    pub manifest: Manifest,
    #[serde(default)]
    pub config: DepwatchConfig,
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads and parses the manifest file at `path`.
pub fn load_manifest(path: &Path) -> Result<ManifestFile, InputError> {
    let content = std::fs::read_to_string(path).map_err(|source| InputError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let file: ManifestFile =
        serde_json::from_str(&content).map_err(|source| InputError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    tracing::debug!(
        "loaded manifest '{}' with {} aliases",
        file.manifest.name,
        file.manifest.aliases.len()
    );
    Ok(file)
}
