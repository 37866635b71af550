//! Decoder for yarn's newline-delimited JSON output
//!
//! Every line yarn prints under `--json` is an object of the form
//! `{"type": "...", "data": ...}`. The decoder borrows the raw text and
//! hands out iterators over typed records; it can be iterated any number of
//! times. Lines that fail to decode are yielded as `MalformedEntry` values
//! instead of aborting the sequence.

use crate::domain::MalformedEntry;
use serde::Deserialize;
use serde_json::Value;
use std::iter::Enumerate;
use std::str::Lines;

/// A typed yarn output record
#[derive(Debug, Clone, PartialEq)]
pub enum YarnRecord {
    /// Dependency tree (`yarn list`)
    Tree(TreeData),
    /// Tabular report (`yarn outdated`)
    Table(TableData),
    /// Informational message
    Info(Value),
    /// Warning message
    Warning(Value),
    /// Error message
    Error(Value),
    /// Any other record type (activity ticks, progress, ...)
    Other { kind: String, data: Value },
}

/// Payload of a `tree` record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeData {
    /// Top-level nodes; decoded individually so one bad node is skippable
    #[serde(default)]
    pub trees: Vec<Value>,
}

/// One node of a `tree` record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TreeNode {
    /// `name@version`
    pub name: String,
    #[serde(default)]
    pub children: Vec<Value>,
    #[serde(default)]
    pub depth: Option<u32>,
}

/// Payload of a `table` record
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TableData {
    /// Column names
    pub head: Vec<String>,
    /// Rows; decoded individually so one bad row is skippable
    #[serde(default)]
    pub body: Vec<Value>,
}

impl TableData {
    /// Index of a column by name
    pub fn column(&self, name: &str) -> Option<usize> {
        self.head.iter().position(|h| h.eq_ignore_ascii_case(name))
    }
}

#[derive(Deserialize)]
struct RawRecord {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Value,
}

/// Borrowing decoder over yarn's NDJSON output
#[derive(Debug, Clone, Copy)]
pub struct NdjsonDecoder<'a> {
    input: &'a str,
}

impl<'a> NdjsonDecoder<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input }
    }

    /// A fresh iterator over the records, starting at the first line
    pub fn records(&self) -> Records<'a> {
        Records {
            lines: self.input.lines().enumerate(),
        }
    }

    /// Decode everything, splitting good records from malformed lines
    pub fn decode(&self) -> Decoded {
        let mut decoded = Decoded::default();
        for record in self.records() {
            match record {
                Ok(record) => decoded.records.push(record),
                Err(malformed) => decoded.malformed.push(malformed),
            }
        }
        decoded
    }
}

/// Fully decoded NDJSON output
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Decoded {
    pub records: Vec<YarnRecord>,
    pub malformed: Vec<MalformedEntry>,
}

/// Lazy iterator over the records of an `NdjsonDecoder`
#[derive(Debug, Clone)]
pub struct Records<'a> {
    lines: Enumerate<Lines<'a>>,
}

impl Iterator for Records<'_> {
    type Item = Result<YarnRecord, MalformedEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, line) in self.lines.by_ref() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            return Some(
                decode_line(line).map_err(|reason| MalformedEntry::new(index + 1, reason)),
            );
        }
        None
    }
}

fn decode_line(line: &str) -> Result<YarnRecord, String> {
    let raw: RawRecord = serde_json::from_str(line).map_err(|e| e.to_string())?;

    let record = match raw.kind.as_str() {
        "tree" => YarnRecord::Tree(
            serde_json::from_value(raw.data).map_err(|e| format!("invalid tree: {}", e))?,
        ),
        "table" => YarnRecord::Table(
            serde_json::from_value(raw.data).map_err(|e| format!("invalid table: {}", e))?,
        ),
        "info" => YarnRecord::Info(raw.data),
        "warning" => YarnRecord::Warning(raw.data),
        "error" => YarnRecord::Error(raw.data),
        _ => YarnRecord::Other {
            kind: raw.kind,
            data: raw.data,
        },
    };

    Ok(record)
}
