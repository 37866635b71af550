//! Application error types using thiserror
//!
//! Error hierarchy:
//! - ManifestError: package.json could not be read; always recovered locally
//! - ToolError: an external package-manager invocation failed; always propagated
//! - ConfigError: invalid CLI or service configuration

use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Application-level error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Manifest file related errors
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// External tool related errors
    #[error(transparent)]
    Tool(#[from] ToolError),

    /// Configuration related errors
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to reading the project manifest
#[derive(Error, Debug)]
pub enum ManifestError {
    /// Manifest file not found
    #[error("manifest file not found: {path}")]
    NotFound { path: PathBuf },

    /// Failed to read manifest file
    #[error("failed to read manifest file {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("failed to parse JSON in {path}: {message}")]
    JsonParseError { path: PathBuf, message: String },
}

/// Errors raised while invoking a package manager or reading its output
///
/// Any of these fails the whole reconciliation; no partial result is returned.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ToolError {
    /// The process could not be spawned, timed out, or exited with an
    /// unaccepted status
    #[error("`{command}` failed: {reason}")]
    InvocationFailed { command: String, reason: String },

    /// The tool ran but reported a structured error payload
    #[error("`{command}` reported an error: {}", render_payload(.payload))]
    ReportedError { command: String, payload: Value },

    /// The tool's output could not be decoded as a whole
    #[error("could not parse output of `{command}`: {message}")]
    UnparsableOutput { command: String, message: String },
}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Invalid duration format
    #[error("invalid duration format '{value}': expected format like '500ms', '30s', '2m'")]
    InvalidDuration { value: String },

    /// Invalid dialect override
    #[error("invalid dialect '{value}': expected 'npm' or 'yarn'")]
    InvalidDialect { value: String },

    /// Invalid project path
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: PathBuf, message: String },
}

fn render_payload(payload: &Value) -> String {
    match payload {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}

impl ManifestError {
    /// Creates a new NotFound error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        ManifestError::NotFound { path: path.into() }
    }

    /// Creates a new ReadError
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ManifestError::ReadError {
            path: path.into(),
            source,
        }
    }

    /// Creates a new JsonParseError
    pub fn json_parse_error(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ManifestError::JsonParseError {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl ToolError {
    /// The process could not be started
    pub fn spawn_failed(command: impl Into<String>, source: &std::io::Error) -> Self {
        ToolError::InvocationFailed {
            command: command.into(),
            reason: format!("could not start process: {}", source),
        }
    }

    /// The process did not finish within the allotted time
    pub fn timed_out(command: impl Into<String>, timeout: Duration) -> Self {
        ToolError::InvocationFailed {
            command: command.into(),
            reason: format!("timed out after {:?}", timeout),
        }
    }

    /// The process exited with a status the command does not accept
    pub fn exit_status(command: impl Into<String>, code: Option<i32>, stderr: &str) -> Self {
        let status = match code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        };
        let stderr = stderr.trim();
        let reason = if stderr.is_empty() {
            status
        } else {
            format!("{}: {}", status, stderr)
        };
        ToolError::InvocationFailed {
            command: command.into(),
            reason,
        }
    }

    /// The tool reported a structured error payload
    pub fn reported(command: impl Into<String>, payload: Value) -> Self {
        ToolError::ReportedError {
            command: command.into(),
            payload,
        }
    }

    /// The output could not be decoded as a whole
    pub fn unparsable(command: impl Into<String>, message: impl Into<String>) -> Self {
        ToolError::UnparsableOutput {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Returns the command line that failed
    pub fn command(&self) -> &str {
        match self {
            ToolError::InvocationFailed { command, .. }
            | ToolError::ReportedError { command, .. }
            | ToolError::UnparsableOutput { command, .. } => command,
        }
    }

    /// Returns the tool's own error payload, if it reported one
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ToolError::ReportedError { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Returns true for spawn failures, timeouts and unaccepted exit statuses
    pub fn is_invocation_failure(&self) -> bool {
        matches!(self, ToolError::InvocationFailed { .. })
    }
}

impl ConfigError {
    /// Creates a new InvalidDuration error
    pub fn invalid_duration(value: impl Into<String>) -> Self {
        ConfigError::InvalidDuration {
            value: value.into(),
        }
    }

    /// Creates a new InvalidDialect error
    pub fn invalid_dialect(value: impl Into<String>) -> Self {
        ConfigError::InvalidDialect {
            value: value.into(),
        }
    }

    /// Creates a new InvalidPath error
    pub fn invalid_path(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        ConfigError::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_manifest_error_not_found() {
        let err = ManifestError::not_found("/path/to/package.json");
        let msg = format!("{}", err);
        assert!(msg.contains("manifest file not found"));
        assert!(msg.contains("package.json"));
    }

    #[test]
    fn test_manifest_error_json_parse() {
        let err = ManifestError::json_parse_error("/path/to/package.json", "unexpected token");
        let msg = format!("{}", err);
        assert!(msg.contains("failed to parse JSON"));
        assert!(msg.contains("unexpected token"));
    }

    #[test]
    fn test_tool_error_timed_out() {
        let err = ToolError::timed_out("npm ls --depth=0 --json", Duration::from_secs(2));
        assert!(err.is_invocation_failure());
        assert!(err.to_string().contains("timed out after 2s"));
        assert_eq!(err.command(), "npm ls --depth=0 --json");
    }

    #[test]
    fn test_tool_error_exit_status_with_stderr() {
        let err = ToolError::exit_status("npm outdated --json", Some(2), "  npm ERR! boom\n");
        assert_eq!(
            err.to_string(),
            "`npm outdated --json` failed: exited with status 2: npm ERR! boom"
        );
    }

    #[test]
    fn test_tool_error_exit_status_signal() {
        let err = ToolError::exit_status("yarn list", None, "");
        assert!(err.to_string().ends_with("terminated by signal"));
    }

    #[test]
    fn test_tool_error_spawn_failed() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = ToolError::spawn_failed("yarn outdated", &source);
        assert!(err.is_invocation_failure());
        assert!(err.to_string().contains("could not start process"));
    }

    #[test]
    fn test_tool_error_reported_keeps_payload() {
        let payload = json!("Outdated lockfile. Please run `yarn install` and try again.");
        let err = ToolError::reported("yarn outdated --json", payload.clone());
        assert_eq!(err.payload(), Some(&payload));
        assert!(!err.is_invocation_failure());
        assert!(err.to_string().ends_with("Please run `yarn install` and try again."));
    }

    #[test]
    fn test_tool_error_reported_renders_objects_as_json() {
        let err = ToolError::reported("npm outdated --json", json!({"code": "E404"}));
        assert!(err.to_string().contains(r#"{"code":"E404"}"#));
    }

    #[test]
    fn test_config_error_invalid_duration() {
        let err = ConfigError::InvalidDuration {
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("invalid duration format"));
    }

    #[test]
    fn test_app_error_from_tool_error() {
        let app_err: AppError = ToolError::unparsable("npm ls", "expected value").into();
        assert!(app_err.to_string().contains("could not parse output of `npm ls`"));
    }

    #[test]
    fn test_app_error_from_manifest_error() {
        let app_err: AppError = ManifestError::not_found("/path").into();
        assert!(app_err.to_string().contains("manifest file not found"));
    }

    #[test]
    fn test_error_debug_trait() {
        let err = ManifestError::not_found("/test");
        let debug = format!("{:?}", err);
        assert!(debug.contains("NotFound"));
    }
}
