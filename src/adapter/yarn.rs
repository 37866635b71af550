//! yarn (classic) adapter
//!
//! Commands: `yarn list --depth=0 --json`, `yarn outdated --depth=0 --json`

use crate::adapter::{accept_listing, DialectAdapter};
use crate::domain::{Dialect, InstalledMap, OutdatedMap};
use crate::error::ToolError;
use crate::normalize::yarn;
use crate::package_manager::{CommandLine, ProcessRunner};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

/// yarn adapter
pub struct YarnAdapter {
    runner: Arc<dyn ProcessRunner>,
}

impl YarnAdapter {
    /// Create a new yarn adapter
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self { runner }
    }

    fn list_command() -> CommandLine {
        CommandLine::new(Dialect::Yarn.program(), ["list", "--depth=0", "--json"])
    }

    fn outdated_command() -> CommandLine {
        CommandLine::new(Dialect::Yarn.program(), ["outdated", "--depth=0", "--json"])
    }
}

#[async_trait]
impl DialectAdapter for YarnAdapter {
    fn dialect(&self) -> Dialect {
        Dialect::Yarn
    }

    async fn list_installed(&self, project: &Path) -> Result<InstalledMap, ToolError> {
        let output = self.runner.run(project, &Self::list_command()).await?;
        let listing = yarn::normalize_installed(&output)?;
        Ok(accept_listing(&output.command, listing))
    }

    async fn list_outdated(&self, project: &Path) -> Result<OutdatedMap, ToolError> {
        let output = self.runner.run(project, &Self::outdated_command()).await?;
        let listing = yarn::normalize_outdated(&output)?;
        Ok(accept_listing(&output.command, listing))
    }
}
