//! Package manager process execution
//!
//! This module provides:
//! - The command line and captured output types exchanged with runners
//! - The `ProcessRunner` seam the dialect adapters call through
//! - A tokio-based runner bounded by a timeout

use crate::error::ToolError;
use async_trait::async_trait;
use std::fmt;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tracing::debug;

/// Default timeout for a single package manager invocation
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// A program plus its arguments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommandLine {
    pub program: String,
    pub args: Vec<String>,
}

impl CommandLine {
    /// Create a command line from a program and its arguments
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// The command line that produced this output
    pub command: String,
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
}

impl ProcessOutput {
    /// Create an output record
    pub fn new(
        command: impl Into<String>,
        stdout: impl Into<String>,
        stderr: impl Into<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            command: command.into(),
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code,
        }
    }

    /// Fail unless the process exited with one of the accepted codes
    pub fn ensure_exit(&self, accepted: &[i32]) -> Result<(), ToolError> {
        match self.exit_code {
            Some(code) if accepted.contains(&code) => Ok(()),
            code => Err(ToolError::exit_status(&self.command, code, &self.stderr)),
        }
    }
}

/// Trait for running package manager commands inside a project directory
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Run a command with `project` as the working directory
    async fn run(&self, project: &Path, command: &CommandLine)
        -> Result<ProcessOutput, ToolError>;
}

/// Runner that executes real processes with a per-invocation timeout
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    /// Create a runner with the default timeout
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a runner with a custom timeout
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// The timeout applied to each invocation
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    async fn run(
        &self,
        project: &Path,
        command: &CommandLine,
    ) -> Result<ProcessOutput, ToolError> {
        let line = command.to_string();
        debug!("running `{}` in {}", line, project.display());

        let mut child = tokio::process::Command::new(&command.program);
        child
            .args(&command.args)
            .current_dir(project)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let output = match tokio::time::timeout(self.timeout, child.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ToolError::spawn_failed(line, &e)),
            Err(_) => return Err(ToolError::timed_out(line, self.timeout)),
        };

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        debug!(
            "`{}` exited with {:?} ({} bytes stdout, {} bytes stderr)",
            line,
            output.status.code(),
            stdout.len(),
            stderr.len()
        );

        Ok(ProcessOutput::new(
            line,
            stdout,
            stderr,
            output.status.code(),
        ))
    }
}
