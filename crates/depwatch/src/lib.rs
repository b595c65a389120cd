//! Command-line front end for depwatch.
//!
//! Reads a package manifest from a JSON file, resolves it against a Maven
//! repository and reports the detected fields.

pub mod input;
pub mod report;

pub use input::{InputError, ManifestFile, load_manifest};
pub use report::{Report, detect, run};
