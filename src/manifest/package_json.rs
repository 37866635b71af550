//! package.json parser for declared dependency sets
//!
//! Handles:
//! - dependencies
//! - devDependencies
//!
//! Key order of the file is kept, so records come out in manifest order.

use crate::domain::{DeclaredDependencies, DependencySpec};
use crate::error::ManifestError;
use serde_json::{Map, Value};
use std::path::Path;
use tracing::debug;

/// Parser for package.json files
pub struct PackageJsonParser;

impl PackageJsonParser {
    /// Parse the declared dependency sets from package.json content
    pub fn parse(
        &self,
        content: &str,
        path: &Path,
    ) -> Result<DeclaredDependencies, ManifestError> {
        let json: Value = serde_json::from_str(content)
            .map_err(|e| ManifestError::json_parse_error(path, e.to_string()))?;

        let mut declared = DeclaredDependencies::default();

        if let Some(deps) = json.get("dependencies").and_then(|v| v.as_object()) {
            parse_dependency_object(deps, &mut declared.production);
        }

        if let Some(deps) = json.get("devDependencies").and_then(|v| v.as_object()) {
            parse_dependency_object(deps, &mut declared.development);
        }

        Ok(declared)
    }
}

fn parse_dependency_object(deps: &Map<String, Value>, output: &mut Vec<DependencySpec>) {
    for (name, range) in deps {
        match range.as_str() {
            Some(range) => output.push(DependencySpec::new(name.clone(), range)),
            None => debug!("ignoring non-string range for {}: {}", name, range),
        }
    }
}
