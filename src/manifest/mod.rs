//! Manifest reading for declared dependencies
//!
//! This module provides functionality to:
//! - Read the declared production/development sets from package.json
//! - Degrade to empty sets when the manifest is missing or unparsable
//! - Recognise directories that look like JavaScript projects

mod package_json;

pub use package_json::PackageJsonParser;

use crate::domain::{DeclaredDependencies, Dialect};
use crate::error::ManifestError;
use std::path::Path;
use tracing::{debug, warn};

/// Name of the project descriptor file
pub const MANIFEST_FILENAME: &str = "package.json";

/// Read the declared dependency sets of a project, failing on any problem
pub fn read_manifest(project: &Path) -> Result<DeclaredDependencies, ManifestError> {
    let path = project.join(MANIFEST_FILENAME);
    let content = std::fs::read_to_string(&path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ManifestError::not_found(&path)
        } else {
            ManifestError::read_error(&path, e)
        }
    })?;

    PackageJsonParser.parse(&content, &path)
}

/// Read the declared dependency sets of a project.
///
/// A missing or unparsable manifest yields two empty sets; the error is
/// logged and never surfaced.
pub fn read_declared(project: &Path) -> DeclaredDependencies {
    match read_manifest(project) {
        Ok(declared) => declared,
        Err(ManifestError::NotFound { path }) => {
            debug!("no manifest at {}", path.display());
            DeclaredDependencies::default()
        }
        Err(e) => {
            warn!("{}; treating project as declaring no dependencies", e);
            DeclaredDependencies::default()
        }
    }
}

/// Returns true if the directory contains a manifest or a lock file
pub fn is_project_dir(dir: &Path) -> bool {
    dir.join(MANIFEST_FILENAME).is_file() || Dialect::all().iter().any(|d| d.has_lock_file(dir))
}
