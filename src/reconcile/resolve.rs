//! Wanted/latest version derivation
//!
//! A package missing from the outdated report is up to date, so both
//! `wanted` and `latest` collapse onto the installed version. When a record
//! exists its values are used as-is, with `latest` falling back to `wanted`.

use crate::domain::OutdatedEntry;

/// The three version fields of a status record, resolved in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedVersions {
    pub installed: Option<String>,
    pub wanted: Option<String>,
    pub latest: Option<String>,
}

impl ResolvedVersions {
    /// Resolve `wanted` from `installed`, then `latest` from both
    pub fn resolve(installed: Option<&str>, outdated: Option<&OutdatedEntry>) -> Self {
        let wanted = resolve_wanted(installed, outdated);
        let latest = resolve_latest(installed, wanted.as_deref(), outdated);
        Self {
            installed: installed.map(String::from),
            wanted,
            latest,
        }
    }
}

/// Highest version satisfying the declared range
pub fn resolve_wanted(installed: Option<&str>, outdated: Option<&OutdatedEntry>) -> Option<String> {
    match outdated {
        None => installed.map(String::from),
        Some(record) => record.wanted.clone(),
    }
}

/// Highest published version; needs `wanted` resolved first
pub fn resolve_latest(
    installed: Option<&str>,
    wanted: Option<&str>,
    outdated: Option<&OutdatedEntry>,
) -> Option<String> {
    match outdated {
        None => installed.map(String::from),
        Some(record) => record
            .latest
            .clone()
            .or_else(|| wanted.map(String::from)),
    }
}
