// src/manifest.rs

//! Reader for the fetched source's own manifest.
//!
//! The manifest plays two roles: its appearance on disk marks the clone
//! as complete, and its `version` field labels the build when no version
//! selector is given.

use std::path::Path;

use serde::Deserialize;

use crate::errors::{DocdagError, Result};
use crate::fs::FileSystem;

/// The slice of the source manifest the pipeline cares about. Unknown
/// fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceManifest {
    pub version: String,
}

/// Read and parse the manifest at `path`.
///
/// A missing or malformed manifest is a configuration error: the
/// pipeline cannot label the build without it.
pub fn read_manifest(fs: &dyn FileSystem, path: &Path) -> Result<SourceManifest> {
    let contents = fs.read_to_string(path).map_err(|e| {
        DocdagError::ConfigError(format!("reading manifest {}: {}", path.display(), e))
    })?;

    let manifest: SourceManifest = serde_json::from_str(&contents).map_err(|e| {
        DocdagError::ConfigError(format!("parsing manifest {}: {}", path.display(), e))
    })?;

    Ok(manifest)
}
