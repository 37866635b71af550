//! Declared dependencies and reconciled dependency status records

use super::Dialect;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A package name plus the semver range declared for it in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencySpec {
    /// Package name
    pub name: String,
    /// Declared semver range (e.g. `^1.2.0`)
    pub required: String,
}

impl DependencySpec {
    /// Creates a new dependency specification
    pub fn new(name: impl Into<String>, required: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            required: required.into(),
        }
    }
}

/// The two declared dependency sets of a project, each in manifest order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredDependencies {
    /// `dependencies`
    pub production: Vec<DependencySpec>,
    /// `devDependencies`
    pub development: Vec<DependencySpec>,
}

impl DeclaredDependencies {
    /// Returns true if neither set declares anything
    pub fn is_empty(&self) -> bool {
        self.production.is_empty() && self.development.is_empty()
    }

    /// Returns true if `name` is declared in either set
    pub fn declares(&self, name: &str) -> bool {
        self.production
            .iter()
            .chain(self.development.iter())
            .any(|spec| spec.name == name)
    }

    /// Total number of declarations across both sets
    pub fn len(&self) -> usize {
        self.production.len() + self.development.len()
    }
}

/// Classification of a dependency record by origin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    /// Declared in `dependencies`
    Prod,
    /// Declared in `devDependencies`
    Dev,
    /// Installed but declared in neither set
    Extraneous,
}

impl DependencyType {
    /// Returns the serialized label
    pub fn label(&self) -> &'static str {
        match self {
            DependencyType::Prod => "prod",
            DependencyType::Dev => "dev",
            DependencyType::Extraneous => "extraneous",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Manifest-only record returned by the fast path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleDependency {
    /// Dialect governing the project
    pub repo: Dialect,
    /// Package name
    pub name: String,
    /// `prod` or `dev`
    #[serde(rename = "type")]
    pub kind: DependencyType,
    /// Declared semver range
    pub required: String,
}

/// Reconciled status of one package
///
/// Absent version fields mean the value could not be determined from the
/// source data; they are omitted on serialization rather than emitted empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyStatus {
    /// Dialect that produced this record
    pub repo: Dialect,
    /// Package name
    pub name: String,
    /// Origin classification
    #[serde(rename = "type")]
    pub kind: DependencyType,
    /// Declared semver range; never present for extraneous packages
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<String>,
    /// Installed version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed: Option<String>,
    /// Highest version satisfying the declared range
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wanted: Option<String>,
    /// Highest published version
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest: Option<String>,
}

impl DependencyStatus {
    /// Returns true if a newer version than the installed one is published
    pub fn has_update(&self) -> bool {
        match (&self.installed, &self.latest) {
            (Some(installed), Some(latest)) => installed != latest,
            _ => false,
        }
    }

    /// Returns true if the package is declared but not installed
    pub fn is_missing(&self) -> bool {
        self.kind != DependencyType::Extraneous && self.installed.is_none()
    }

    /// Project the record down to its manifest-only fields.
    ///
    /// Returns `None` for extraneous records, which have no manifest counterpart.
    pub fn to_simple(&self) -> Option<SimpleDependency> {
        let required = self.required.clone()?;
        Some(SimpleDependency {
            repo: self.repo,
            name: self.name.clone(),
            kind: self.kind,
            required,
        })
    }
}

impl fmt::Display for DependencyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(installed) = &self.installed {
            write!(f, "@{}", installed)?;
        }
        write!(f, " ({}) [{}]", self.kind, self.repo)
    }
}
