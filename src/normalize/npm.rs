//! npm output normalization
//!
//! - `npm ls --depth=0 --json` prints one document with a `dependencies`
//!   object; entries carry `version` and, when applicable, `extraneous` or
//!   `missing`
//! - `npm outdated --json` prints one object keyed by package name
//! - failures are reported as a top-level `error` object in the same document

use crate::domain::{InstalledEntry, InstalledMap, MalformedEntry, OutdatedEntry, OutdatedMap};
use crate::error::ToolError;
use crate::normalize::Listing;
use crate::package_manager::ProcessOutput;
use serde_json::{Map, Value};
use tracing::debug;

/// `npm ls` exits 1 when the tree has extraneous, missing or invalid packages
pub const LS_ACCEPTED_EXIT: &[i32] = &[0, 1];

/// `npm outdated` exits 1 whenever something is outdated
pub const OUTDATED_ACCEPTED_EXIT: &[i32] = &[0, 1];

/// Error codes npm attaches to an otherwise complete listing
const LISTING_PROBLEM_CODES: &[&str] = &["ELSPROBLEMS"];

/// Normalize `npm ls --depth=0 --json` output
pub fn normalize_installed(output: &ProcessOutput) -> Result<Listing<InstalledMap>, ToolError> {
    let Some(document) = decode_document(output, LS_ACCEPTED_EXIT)? else {
        return Ok(Listing::default());
    };

    let dependencies = match document.get("dependencies") {
        None => return Ok(Listing::default()),
        Some(Value::Object(dependencies)) => dependencies,
        Some(other) => {
            return Err(ToolError::unparsable(
                &output.command,
                format!("`dependencies` is not an object: {}", other),
            ));
        }
    };

    let mut installed = InstalledMap::new();
    let mut malformed = Vec::new();

    for (index, (name, value)) in dependencies.iter().enumerate() {
        match decode_installed(name, value) {
            Ok(entry) => installed.insert(entry),
            Err(reason) => malformed.push(MalformedEntry::new(index + 1, reason)),
        }
    }

    Ok(Listing::new(installed, malformed))
}

/// Normalize `npm outdated --json` output
pub fn normalize_outdated(output: &ProcessOutput) -> Result<Listing<OutdatedMap>, ToolError> {
    let Some(document) = decode_document(output, OUTDATED_ACCEPTED_EXIT)? else {
        return Ok(Listing::default());
    };

    let Value::Object(packages) = document else {
        return Err(ToolError::unparsable(
            &output.command,
            "expected an object keyed by package name",
        ));
    };

    let mut outdated = OutdatedMap::new();
    let mut malformed = Vec::new();

    for (index, (name, value)) in packages.into_iter().enumerate() {
        if name == "error" && is_error_payload(&value) {
            continue;
        }
        match decode_outdated(value) {
            Ok(entry) => {
                outdated.insert(name, entry);
            }
            Err(reason) => malformed.push(MalformedEntry::new(
                index + 1,
                format!("{}: {}", name, reason),
            )),
        }
    }

    Ok(Listing::new(outdated, malformed))
}

/// Parse stdout as one JSON document, then check the error channel and the
/// exit status, in that order.
///
/// Empty stdout on an accepted exit status means "nothing to report".
fn decode_document(
    output: &ProcessOutput,
    accepted: &[i32],
) -> Result<Option<Value>, ToolError> {
    let text = output.stdout.trim();
    let parsed = if text.is_empty() {
        Ok(None)
    } else {
        serde_json::from_str::<Value>(text)
            .map(Some)
            .map_err(|e| e.to_string())
    };

    if let Ok(Some(document)) = &parsed {
        check_reported_error(output, document)?;
    }
    output.ensure_exit(accepted)?;

    parsed.map_err(|message| ToolError::unparsable(&output.command, message))
}

/// Surface npm's top-level `error` object verbatim
fn check_reported_error(output: &ProcessOutput, document: &Value) -> Result<(), ToolError> {
    let Some(error) = document.get("error").filter(|e| is_error_payload(e)) else {
        return Ok(());
    };

    let code = error.get("code").and_then(Value::as_str).unwrap_or_default();
    if LISTING_PROBLEM_CODES.contains(&code) {
        let summary = error.get("summary").and_then(Value::as_str).unwrap_or_default();
        debug!("`{}` reported {}: {}", output.command, code, summary);
        return Ok(());
    }

    Err(ToolError::reported(&output.command, error.clone()))
}

/// Distinguishes npm's error object from an outdated package named `error`
fn is_error_payload(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let describes_error = object.contains_key("code") || object.contains_key("summary");
    let describes_package = object.contains_key("wanted") || object.contains_key("latest");
    describes_error && !describes_package
}

fn decode_installed(name: &str, value: &Value) -> Result<InstalledEntry, String> {
    let object: &Map<String, Value> = value
        .as_object()
        .ok_or_else(|| format!("{}: entry is not an object", name))?;

    let version = match object.get("version") {
        None | Some(Value::Null) => None,
        Some(Value::String(version)) => Some(version.clone()),
        Some(other) => return Err(format!("{}: version is not a string: {}", name, other)),
    };

    let extraneous = object
        .get("extraneous")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    Ok(InstalledEntry::new(name, version).with_extraneous(extraneous))
}

fn decode_outdated(value: Value) -> Result<OutdatedEntry, String> {
    // Workspaces report one object per location; the first one wins.
    let value = match value {
        Value::Array(locations) => locations
            .into_iter()
            .next()
            .ok_or_else(|| "empty location list".to_string())?,
        other => other,
    };
    serde_json::from_value(value).map_err(|e| e.to_string())
}
