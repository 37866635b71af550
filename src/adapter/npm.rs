//! npm adapter
//!
//! Commands: `npm ls --depth=0 --json`, `npm outdated --json`

use crate::adapter::{accept_listing, DialectAdapter};
use crate::domain::{Dialect, InstalledMap, OutdatedMap};
use crate::error::ToolError;
use crate::normalize::npm;
use crate::package_manager::{CommandLine, ProcessRunner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// npm adapter
pub struct NpmAdapter {
    runner: Arc<dyn ProcessRunner>,
}

impl NpmAdapter {
    /// Create a new npm adapter
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn ls_command() -> CommandLine {
        CommandLine::new(Dialect::Npm.program(), ["ls", "--depth=0", "--json"])
    }

    fn outdated_command() -> CommandLine {
        CommandLine::new(Dialect::Npm.program(), ["outdated", "--json"])
    }
}

#[async_trait]
impl DialectAdapter for NpmAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Npm
    }

    async fn list_installed(&self, project: &Path) -> Result<InstalledMap, ToolError> {
        let output = self.runner.run(project, &Self::ls_command()).await?;
        let listing = npm::normalize_installed(&output)?;
        Ok(accept_listing(&output.command, listing))
    }

    async fn list_outdated(&self, project: &Path) -> Result<OutdatedMap, ToolError> {
        let output = self.runner.run(project, &Self::outdated_command()).await?;
        let listing = npm::normalize_outdated(&output)?;
        Ok(accept_listing(&output.command, listing))
    }
}
