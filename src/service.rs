//! Dependency service coordinating the inspection workflow
//!
//! This module provides:
//! - Dialect detection with an optional configured override
//! - The manifest-only fast path (no external processes)
//! - The full path: detect → read manifest → list installed and outdated
//!   concurrently → reconcile, cached per `(session, project)`

use crate::adapter::create_adapter;
use crate::cache::{CacheKey, ResultCache, DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::domain::{DependencyStatus, DependencyType, Dialect, SimpleDependency};
use crate::error::{AppError, ConfigError, ToolError};
use crate::manifest::{is_project_dir, read_declared};
use crate::package_manager::{ProcessRunner, SystemRunner, DEFAULT_TIMEOUT};
use crate::progress::Progress;
use crate::reconcile::Reconciler;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Service configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Timeout applied to each package manager invocation
    pub timeout: Duration,
    /// How long a full result stays cached
    pub cache_ttl: Duration,
    /// Maximum number of cached projects
    pub cache_capacity: u64,
    /// Dialect to use instead of lock-file detection
    pub dialect: Option<Dialect>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: DEFAULT_TTL,
            cache_capacity: DEFAULT_CAPACITY,
            dialect: None,
        }
    }
}

/// Which path an inspection takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Declared dependencies only
    Simple,
    /// Declared, installed and outdated reconciled
    #[default]
    Full,
}

/// Result of one inspection
#[derive(Debug, Clone, PartialEq)]
pub enum Inspection {
    Simple(Vec<SimpleDependency>),
    Full(Vec<DependencyStatus>),
}

impl Inspection {
    pub fn len(&self) -> usize {
        match self {
            Inspection::Simple(records) => records.len(),
            Inspection::Full(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Entry point for inspecting a project's dependencies
pub struct DependencyService {
    config: ServiceConfig,
    runner: Arc<dyn ProcessRunner>,
    cache: ResultCache,
}

impl DependencyService {
    /// Create a service that runs real package manager processes
    pub fn new(config: ServiceConfig) -> Self {
        let runner = Arc::new(SystemRunner::with_timeout(config.timeout));
        Self::with_runner(config, runner)
    }

    /// Create a service with a custom process runner (for testing)
    pub fn with_runner(config: ServiceConfig, runner: Arc<dyn ProcessRunner>) -> Self {
        let cache = ResultCache::new(config.cache_ttl, config.cache_capacity);
        Self {
            config,
            runner,
            cache,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Dialect governing `project`; the configured override wins
    pub fn detect_dialect(&self, project: &Path) -> Dialect {
        match self.config.dialect {
            Some(dialect) => dialect,
            None => Dialect::detect(project),
        }
    }

    /// Declared dependencies only, production first; never fails
    pub fn get_dependencies_simple(&self, project: &Path) -> Vec<SimpleDependency> {
        let dialect = self.detect_dialect(project);
        let declared = read_declared(project);

        let production = declared
            .production
            .into_iter()
            .map(|spec| (spec, DependencyType::Prod));
        let development = declared
            .development
            .into_iter()
            .map(|spec| (spec, DependencyType::Dev));

        production
            .chain(development)
            .map(|(spec, kind)| SimpleDependency {
                repo: dialect,
                name: spec.name,
                kind,
                required: spec.required,
            })
            .collect()
    }

    /// Full reconciliation, cached under `key`
    ///
    /// Fails as a whole when either tool invocation fails; no partial list
    /// is returned.
    #[tracing::instrument(skip(self, key), fields(session = key.session_id()))]
    pub async fn get_dependencies_full(
        &self,
        project: &Path,
        key: &CacheKey,
    ) -> Result<Vec<DependencyStatus>, ToolError> {
        let statuses = self
            .cache
            .get_or_compute(key.clone(), self.reconcile_project(project))
            .await?;
        Ok(statuses.as_ref().clone())
    }

    async fn reconcile_project(&self, project: &Path) -> Result<Vec<DependencyStatus>, ToolError> {
        let dialect = self.detect_dialect(project);
        info!("reconciling {} as a {} project", project.display(), dialect);

        let declared = read_declared(project);
        let adapter = create_adapter(dialect, self.runner.clone());

        let (installed, outdated) = tokio::try_join!(
            adapter.list_installed(project),
            adapter.list_outdated(project),
        )?;
        debug!(
            "{} declared, {} installed, {} outdated",
            declared.len(),
            installed.len(),
            outdated.len()
        );

        Ok(Reconciler::new(adapter.dialect()).reconcile(&declared, &installed, &outdated))
    }

    /// Run one inspection with optional progress display
    pub async fn run_with_progress(
        &self,
        project: &Path,
        mode: Mode,
        key: &CacheKey,
        show_progress: bool,
    ) -> Result<Inspection, AppError> {
        if !project.is_dir() {
            return Err(ConfigError::invalid_path(project, "not a directory").into());
        }
        if !is_project_dir(project) {
            warn!(
                "{} has neither package.json nor a lock file",
                project.display()
            );
        }

        match mode {
            Mode::Simple => Ok(Inspection::Simple(self.get_dependencies_simple(project))),
            Mode::Full => {
                let mut progress = Progress::new(show_progress);
                progress.spinner(&format!(
                    "Querying {}...",
                    self.detect_dialect(project).display_name()
                ));
                let result = self.get_dependencies_full(project, key).await;
                progress.finish_and_clear();
                Ok(Inspection::Full(result?))
            }
        }
    }
}

impl Default for DependencyService {
    fn default() -> Self {
        Self::new(ServiceConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::testing::CannedRunner;
    use std::fs;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "name": "app",
        "dependencies": {"react": "^18.0.0"},
        "devDependencies": {"vitest": "^1.0.0"}
    }"#;

    fn project(lock: Option<&str>) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), MANIFEST).unwrap();
        if let Some(lock) = lock {
            fs::write(dir.path().join(lock), "").unwrap();
        }
        dir
    }

    fn service(runner: CannedRunner) -> DependencyService {
        DependencyService::with_runner(ServiceConfig::default(), Arc::new(runner))
    }

    #[test]
    fn test_default_config() {
        let config = ServiceConfig::default();
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.cache_capacity, DEFAULT_CAPACITY);
        assert!(config.dialect.is_none());
    }

    #[test]
    fn test_detect_dialect() {
        let svc = service(CannedRunner::default());
        assert_eq!(svc.detect_dialect(project(None).path()), Dialect::Npm);
        assert_eq!(svc.detect_dialect(project(Some("yarn.lock")).path()), Dialect::Yarn);
        assert_eq!(svc.detect_dialect(Path::new("/nonexistent/dir")), Dialect::Npm);
    }

    #[test]
    fn test_dialect_override_wins() {
        let config = ServiceConfig {
            dialect: Some(Dialect::Npm),
            ..ServiceConfig::default()
        };
        let svc = DependencyService::with_runner(config, Arc::new(CannedRunner::default()));
        assert_eq!(svc.detect_dialect(project(Some("yarn.lock")).path()), Dialect::Npm);
    }

    #[test]
    fn test_simple_path() {
        let svc = service(CannedRunner::default());
        let dir = project(Some("yarn.lock"));
        let records = svc.get_dependencies_simple(dir.path());

        assert_eq!(
            records,
            vec![
                SimpleDependency {
                    repo: Dialect::Yarn,
                    name: "react".to_string(),
                    kind: DependencyType::Prod,
                    required: "^18.0.0".to_string(),
                },
                SimpleDependency {
                    repo: Dialect::Yarn,
                    name: "vitest".to_string(),
                    kind: DependencyType::Dev,
                    required: "^1.0.0".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_simple_path_without_manifest() {
        let svc = service(CannedRunner::default());
        let dir = TempDir::new().unwrap();
        assert!(svc.get_dependencies_simple(dir.path()).is_empty());
    }

    #[tokio::test]
    async fn test_full_path_npm() {
        let runner = CannedRunner::default()
            .respond(
                "npm ls --depth=0 --json",
                r#"{"dependencies":{"react":{"version":"18.2.0"},"vitest":{"version":"1.6.0"}}}"#,
                "",
                0,
            )
            .respond(
                "npm outdated --json",
                r#"{"react":{"current":"18.2.0","wanted":"18.3.1","latest":"19.0.0"}}"#,
                "",
                1,
            );
        let svc = service(runner);
        let dir = project(None);

        let records = svc
            .get_dependencies_full(dir.path(), &CacheKey::new("t", dir.path()))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].latest.as_deref(), Some("19.0.0"));
        assert_eq!(records[1].wanted.as_deref(), Some("1.6.0"));
    }

    #[tokio::test]
    async fn test_full_path_is_cached() {
        let runner = Arc::new(
            CannedRunner::default()
                .respond("npm ls --depth=0 --json", "{}", "", 0)
                .respond("npm outdated --json", "", "", 0),
        );
        let svc = DependencyService::with_runner(ServiceConfig::default(), runner.clone());
        let dir = project(None);
        let key = CacheKey::new("t", dir.path());

        svc.get_dependencies_full(dir.path(), &key).await.unwrap();
        svc.get_dependencies_full(dir.path(), &key).await.unwrap();

        assert_eq!(runner.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_run_with_progress_rejects_missing_dir() {
        let svc = service(CannedRunner::default());
        let err = svc
            .run_with_progress(
                Path::new("/nonexistent/project"),
                Mode::Simple,
                &CacheKey::new("t", "/nonexistent/project"),
                false,
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[tokio::test]
    async fn test_run_with_progress_simple() {
        let svc = service(CannedRunner::default());
        let dir = project(None);
        let inspection = svc
            .run_with_progress(dir.path(), Mode::Simple, &CacheKey::new("t", dir.path()), false)
            .await
            .unwrap();
        assert_eq!(inspection.len(), 2);
    }
}
