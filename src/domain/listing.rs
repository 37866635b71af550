//! Normalized tool listings shared by both dialects

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One package as reported by a package manager's list command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstalledEntry {
    /// Package name
    pub name: String,
    /// Resolved installed version, absent when declared but not installed
    pub version: Option<String>,
    /// Extraneous flag; `None` when the dialect does not report one
    pub extraneous: Option<bool>,
}

impl InstalledEntry {
    /// Creates an entry with no extraneous information
    pub fn new(name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            name: name.into(),
            version,
            extraneous: None,
        }
    }

    /// Sets the extraneous flag (builder pattern)
    pub fn with_extraneous(mut self, extraneous: bool) -> Self {
        self.extraneous = Some(extraneous);
        self
    }
}

/// Installed packages keyed by name, iterated in listing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstalledMap {
    entries: IndexMap<String, InstalledEntry>,
}

impl InstalledMap {
    /// Creates an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry; a repeated name replaces the earlier entry in place
    pub fn insert(&mut self, entry: InstalledEntry) {
        self.entries.insert(entry.name.clone(), entry);
    }

    /// Look up an entry by package name
    pub fn get(&self, name: &str) -> Option<&InstalledEntry> {
        self.entries.get(name)
    }

    /// Installed version for a package, if any
    pub fn version_of(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|entry| entry.version.as_deref())
    }

    /// Iterate entries in listing order
    pub fn iter(&self) -> impl Iterator<Item = &InstalledEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<InstalledEntry> for InstalledMap {
    fn from_iter<I: IntoIterator<Item = InstalledEntry>>(iter: I) -> Self {
        let mut map = InstalledMap::new();
        for entry in iter {
            map.insert(entry);
        }
        map
    }
}

/// One package as reported by a package manager's outdated command
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutdatedEntry {
    /// Version the tool believes is installed
    #[serde(default)]
    pub current: Option<String>,
    /// Highest version satisfying the declared range
    #[serde(default)]
    pub wanted: Option<String>,
    /// Highest published version
    #[serde(default)]
    pub latest: Option<String>,
}

impl OutdatedEntry {
    /// Creates an entry from optional wanted/latest values
    pub fn new(wanted: Option<&str>, latest: Option<&str>) -> Self {
        Self {
            current: None,
            wanted: wanted.map(String::from),
            latest: latest.map(String::from),
        }
    }
}

/// Outdated packages keyed by name; up-to-date packages are absent
pub type OutdatedMap = HashMap<String, OutdatedEntry>;

/// A single record of multi-record tool output that could not be decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedEntry {
    /// 1-based line, row or entry position within the listing
    pub position: usize,
    /// Why the record was rejected
    pub reason: String,
}

impl MalformedEntry {
    pub fn new(position: usize, reason: impl Into<String>) -> Self {
        Self {
            position,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MalformedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}: {}", self.position, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_installed_map_preserves_listing_order() {
        let map: InstalledMap = ["zod", "axios", "lodash"]
            .into_iter()
            .map(|name| InstalledEntry::new(name, Some("1.0.0".to_string())))
            .collect();
        let names: Vec<_> = map.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["zod", "axios", "lodash"]);
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_installed_map_replaces_duplicates_in_place() {
        let mut map = InstalledMap::new();
        map.insert(InstalledEntry::new("a", Some("1.0.0".to_string())));
        map.insert(InstalledEntry::new("b", Some("1.0.0".to_string())));
        map.insert(InstalledEntry::new("a", Some("2.0.0".to_string())));
        assert_eq!(map.len(), 2);
        assert_eq!(map.version_of("a"), Some("2.0.0"));
        assert_eq!(map.iter().next().unwrap().name, "a");
    }

    #[test]
    fn test_installed_map_lookup() {
        let mut map = InstalledMap::new();
        map.insert(InstalledEntry::new("missing", None));
        map.insert(InstalledEntry::new("extra", Some("0.1.0".to_string())).with_extraneous(true));
        assert_eq!(map.version_of("missing"), None);
        assert!(map.get("missing").is_some());
        assert_eq!(map.get("extra").unwrap().extraneous, Some(true));
        assert!(map.get("other").is_none());
        assert!(InstalledMap::new().is_empty());
    }

    #[test]
    fn test_outdated_entry_deserialize_partial() {
        let entry: OutdatedEntry = serde_json::from_str(r#"{"wanted":"1.2.0"}"#).unwrap();
        assert_eq!(entry.wanted.as_deref(), Some("1.2.0"));
        assert!(entry.latest.is_none());
        assert!(entry.current.is_none());
    }

    #[test]
    fn test_malformed_entry_display() {
        let entry = MalformedEntry::new(3, "expected value");
        assert_eq!(entry.to_string(), "record 3: expected value");
    }
}
