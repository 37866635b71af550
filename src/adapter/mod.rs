//! Dialect adapters for querying installed and outdated packages
//!
//! This module provides:
//! - npm adapter (`npm ls`, `npm outdated`)
//! - yarn adapter (`yarn list`, `yarn outdated`)
//!
//! Each adapter runs its tool through a shared `ProcessRunner` and hands the
//! captured output to the matching normalizer.

mod npm;
mod yarn;

pub use npm::NpmAdapter;
pub use yarn::YarnAdapter;

use crate::domain::{Dialect, InstalledMap, MalformedEntry, OutdatedMap};
use crate::error::ToolError;
use crate::normalize::Listing;
use crate::package_manager::ProcessRunner;
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Trait for dialect adapters
#[async_trait]
pub trait DialectAdapter: Send + Sync {
    /// Get the dialect this adapter handles
    fn dialect(&self) -> Dialect;

    /// Top-level packages present in the project
    async fn list_installed(&self, project: &Path) -> Result<InstalledMap, ToolError>;

    /// Packages for which a newer version exists
    async fn list_outdated(&self, project: &Path) -> Result<OutdatedMap, ToolError>;
}

/// Create a dialect adapter sharing the given runner
pub fn create_adapter(dialect: Dialect, runner: Arc<dyn ProcessRunner>) -> Box<dyn DialectAdapter> {
    match dialect {
        Dialect::Npm => Box::new(NpmAdapter::new(runner)),
        Dialect::Yarn => Box::new(YarnAdapter::new(runner)),
    }
}

/// Keep the usable entries of a listing, logging what was skipped
fn accept_listing<T>(command: &str, listing: Listing<T>) -> T {
    report_malformed(command, &listing.malformed);
    listing.into_entries()
}

fn report_malformed(command: &str, malformed: &[MalformedEntry]) {
    if malformed.is_empty() {
        return;
    }
    warn!(
        "`{}`: skipped {} malformed entr{}",
        command,
        malformed.len(),
        if malformed.len() == 1 { "y" } else { "ies" }
    );
    for entry in malformed {
        debug!("`{}`: {}", command, entry);
    }
}
