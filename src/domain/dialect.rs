//! Package-manager dialect definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Package-manager dialects whose output can be reconciled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// npm (package-lock.json)
    #[default]
    Npm,
    /// yarn classic (yarn.lock)
    Yarn,
}

impl Dialect {
    /// Returns the lock filename that marks a project as governed by this dialect
    pub fn lock_filename(&self) -> &'static str {
        match self {
            Dialect::Npm => "package-lock.json",
            Dialect::Yarn => "yarn.lock",
        }
    }

    /// Returns the executable name of the package manager
    pub fn program(&self) -> &'static str {
        match self {
            Dialect::Npm => "npm",
            Dialect::Yarn => "yarn",
        }
    }

    /// Returns the display name for this dialect
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Npm => "npm",
            Dialect::Yarn => "Yarn",
        }
    }

    /// Returns all supported dialects
    pub fn all() -> &'static [Dialect] {
        &[Dialect::Npm, Dialect::Yarn]
    }

    /// Detect the dialect governing a project directory.
    ///
    /// A `yarn.lock` selects yarn; anything else, including an unreadable
    /// directory, falls back to npm.
    pub fn detect(project: &Path) -> Dialect {
        if Dialect::Yarn.has_lock_file(project) {
            Dialect::Yarn
        } else {
            Dialect::Npm
        }
    }

    /// Returns true if this dialect's lock file exists in the project
    pub fn has_lock_file(&self, project: &Path) -> bool {
        project.join(self.lock_filename()).is_file()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Npm => write!(f, "npm"),
            Dialect::Yarn => write!(f, "yarn"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "npm" => Ok(Dialect::Npm),
            "yarn" => Ok(Dialect::Yarn),
            other => Err(format!("unknown dialect '{}': expected 'npm' or 'yarn'", other)),
        }
    }
}
