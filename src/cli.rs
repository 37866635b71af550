//! CLI argument parsing module for depinspect

use crate::domain::Dialect;
use crate::error::ConfigError;
use crate::package_manager::DEFAULT_TIMEOUT;
use crate::service::{Mode, ServiceConfig};
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Parse duration string in format: Nms (milliseconds), Ns (seconds), Nm (minutes)
pub fn parse_timeout(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    let invalid = || ConfigError::invalid_duration(s);

    let (num_str, millis_per_unit) = if let Some(n) = s.strip_suffix("ms") {
        (n, 1)
    } else if let Some(n) = s.strip_suffix('s') {
        (n, 1000)
    } else if let Some(n) = s.strip_suffix('m') {
        (n, 60 * 1000)
    } else {
        return Err(invalid());
    };

    let num: u64 = num_str.parse().map_err(|_| invalid())?;
    if num == 0 {
        return Err(invalid());
    }

    let millis = num.checked_mul(millis_per_unit).ok_or_else(invalid)?;
    Ok(Duration::from_millis(millis))
}

/// Parse a dialect override
pub fn parse_dialect(s: &str) -> Result<Dialect, ConfigError> {
    s.parse().map_err(|_| ConfigError::invalid_dialect(s))
}

/// Inspect declared, installed and outdated dependencies of a JS project
#[derive(Parser, Debug, Clone)]
#[command(
    name = "depinspect",
    version,
    about = "Inspect declared, installed and outdated npm/yarn dependencies"
)]
pub struct CliArgs {
    /// Project directory (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Only list dependencies declared in package.json (no npm/yarn calls)
    #[arg(long)]
    pub simple: bool,

    /// Use this package manager instead of detecting it from the lock file
    #[arg(long, value_parser = parse_dialect)]
    pub dialect: Option<Dialect>,

    /// Timeout for each package manager invocation (e.g., 500ms, 30s, 2m)
    #[arg(long, value_parser = parse_timeout, default_value = "60s")]
    pub timeout: Duration,

    /// Session identifier used as part of the result cache key
    #[arg(long, default_value = "cli")]
    pub session: String,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,
}

impl CliArgs {
    /// Which inspection path was requested
    pub fn mode(&self) -> Mode {
        if self.simple {
            Mode::Simple
        } else {
            Mode::Full
        }
    }

    /// Service configuration derived from the arguments
    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            timeout: self.timeout,
            dialect: self.dialect,
            ..ServiceConfig::default()
        }
    }

    /// Whether a spinner should be drawn on stderr
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            simple: false,
            dialect: None,
            timeout: DEFAULT_TIMEOUT,
            session: "cli".to_string(),
            json: false,
            verbose: false,
            quiet: false,
        }
    }
}
