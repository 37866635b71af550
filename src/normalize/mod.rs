//! Tool output normalization for each package-manager dialect
//!
//! Both dialects answer the same two questions (what is installed, what is
//! outdated) in structurally different formats. The normalizers here turn
//! captured process output into the common `InstalledMap` / `OutdatedMap`
//! shapes:
//! - npm: one JSON document per command, errors in a top-level `error` object
//! - yarn: newline-delimited JSON records, errors as records on stderr
//!
//! A single malformed entry is skipped and collected; only a tool-reported
//! error, an unaccepted exit status, or an undecodable document fails the
//! whole operation.

pub mod ndjson;
pub mod npm;
pub mod yarn;

use crate::domain::MalformedEntry;

/// A normalized listing plus the entries that had to be skipped
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Listing<T> {
    /// The normalized entries
    pub entries: T,
    /// Records that could not be decoded
    pub malformed: Vec<MalformedEntry>,
}

impl<T> Listing<T> {
    pub fn new(entries: T, malformed: Vec<MalformedEntry>) -> Self {
        Self { entries, malformed }
    }

    /// Discard the malformed-entry report
    pub fn into_entries(self) -> T {
        self.entries
    }
}
