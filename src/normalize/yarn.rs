//! yarn (classic) output normalization
//!
//! - `yarn list --depth=0 --json` prints a `tree` record whose nodes are
//!   named `name@version`
//! - `yarn outdated --json` prints a `table` record with a header row
//! - failures are reported as `error` records on stderr

use crate::domain::{InstalledEntry, InstalledMap, MalformedEntry, OutdatedEntry, OutdatedMap};
use crate::error::ToolError;
use crate::normalize::ndjson::{NdjsonDecoder, TableData, TreeNode, YarnRecord};
use crate::normalize::Listing;
use crate::package_manager::ProcessOutput;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Exit codes `yarn list` finishes with on success
pub const LIST_ACCEPTED_EXIT: &[i32] = &[0];

/// `yarn outdated` exits 1 whenever something is outdated
pub const OUTDATED_ACCEPTED_EXIT: &[i32] = &[0, 1];

// `name@version`, where a scoped name starts with `@`
static NAME_VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(@?[^@\s]+)@(\S+)$").unwrap());

/// Split a tree node label into package name and version
pub fn split_name_version(label: &str) -> Option<(&str, &str)> {
    let caps = NAME_VERSION_RE.captures(label.trim())?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}

/// Surface the first `error` record yarn wrote to stderr, verbatim
pub fn check_reported_error(output: &ProcessOutput) -> Result<(), ToolError> {
    for record in NdjsonDecoder::new(&output.stderr).records() {
        match record {
            Ok(YarnRecord::Error(payload)) => {
                return Err(ToolError::reported(&output.command, payload));
            }
            Ok(YarnRecord::Warning(message)) => {
                warn!("`{}`: {}", output.command, render(&message));
            }
            Ok(_) => {}
            Err(noise) => debug!("`{}` stderr: unparsed {}", output.command, noise),
        }
    }
    Ok(())
}

/// Normalize `yarn list --depth=0 --json` output
///
/// yarn has no extraneous flag; entries are left unclassified and the
/// reconciler decides based on the manifest.
pub fn normalize_installed(output: &ProcessOutput) -> Result<Listing<InstalledMap>, ToolError> {
    check_reported_error(output)?;
    output.ensure_exit(LIST_ACCEPTED_EXIT)?;

    let mut installed = InstalledMap::new();
    let mut malformed = Vec::new();
    let mut position = 0;

    for record in NdjsonDecoder::new(&output.stdout).records() {
        let tree = match record {
            Ok(YarnRecord::Tree(tree)) => tree,
            Ok(_) => continue,
            Err(entry) => {
                malformed.push(entry);
                continue;
            }
        };

        for node in tree.trees {
            position += 1;
            match decode_tree_node(node) {
                Ok(entry) => installed.insert(entry),
                Err(reason) => malformed.push(MalformedEntry::new(position, reason)),
            }
        }
    }

    Ok(Listing::new(installed, malformed))
}

/// Normalize `yarn outdated --depth=0 --json` output
pub fn normalize_outdated(output: &ProcessOutput) -> Result<Listing<OutdatedMap>, ToolError> {
    check_reported_error(output)?;
    output.ensure_exit(OUTDATED_ACCEPTED_EXIT)?;

    let mut outdated = OutdatedMap::new();
    let mut malformed = Vec::new();
    let mut position = 0;

    for record in NdjsonDecoder::new(&output.stdout).records() {
        let table = match record {
            Ok(YarnRecord::Table(table)) => table,
            Ok(_) => continue,
            Err(entry) => {
                malformed.push(entry);
                continue;
            }
        };

        let columns = match OutdatedColumns::locate(&table) {
            Some(columns) => columns,
            None => {
                malformed.push(MalformedEntry::new(
                    position + 1,
                    format!("table header has no Package column: {:?}", table.head),
                ));
                continue;
            }
        };

        for row in &table.body {
            position += 1;
            match columns.decode_row(row) {
                Ok((name, entry)) => {
                    outdated.insert(name, entry);
                }
                Err(reason) => malformed.push(MalformedEntry::new(position, reason)),
            }
        }
    }

    Ok(Listing::new(outdated, malformed))
}

fn decode_tree_node(node: Value) -> Result<InstalledEntry, String> {
    let node: TreeNode = serde_json::from_value(node).map_err(|e| e.to_string())?;
    let (name, version) = split_name_version(&node.name)
        .ok_or_else(|| format!("cannot split '{}' into name and version", node.name))?;
    Ok(InstalledEntry::new(name, Some(version.to_string())))
}

/// Column positions within a `yarn outdated` table
struct OutdatedColumns {
    package: usize,
    current: Option<usize>,
    wanted: Option<usize>,
    latest: Option<usize>,
}

impl OutdatedColumns {
    fn locate(table: &TableData) -> Option<Self> {
        Some(Self {
            package: table.column("Package")?,
            current: table.column("Current"),
            wanted: table.column("Wanted"),
            latest: table.column("Latest"),
        })
    }

    fn decode_row(&self, row: &Value) -> Result<(String, OutdatedEntry), String> {
        let cells = row
            .as_array()
            .ok_or_else(|| format!("row is not an array: {}", row))?;

        let name = cell(cells, Some(self.package))
            .ok_or_else(|| format!("row has no package name: {}", row))?;

        Ok((
            name,
            OutdatedEntry {
                current: cell(cells, self.current),
                wanted: cell(cells, self.wanted),
                latest: cell(cells, self.latest),
            },
        ))
    }
}

fn cell(cells: &[Value], index: Option<usize>) -> Option<String> {
    cells
        .get(index?)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
