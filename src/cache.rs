//! Result cache for full reconciliations
//!
//! Entries are keyed by `(session, project path)` and expire after a TTL.
//! Concurrent lookups of one key share a single computation; a failed
//! computation leaves nothing behind, so the next caller retries.

use crate::domain::DependencyStatus;
use crate::error::ToolError;
use moka::future::Cache;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Default time-to-live: 3 minutes
pub const DEFAULT_TTL: Duration = Duration::from_secs(3 * 60);

/// Default maximum number of cached projects
pub const DEFAULT_CAPACITY: u64 = 1000;

/// Identifies one cached reconciliation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    session_id: String,
    project: PathBuf,
}

impl CacheKey {
    pub fn new(session_id: impl Into<String>, project: impl Into<PathBuf>) -> Self {
        Self {
            session_id: session_id.into(),
            project: project.into(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn project(&self) -> &Path {
        &self.project
    }
}

/// Shared list of status records as stored in the cache
pub type CachedStatuses = Arc<Vec<DependencyStatus>>;

/// TTL cache over full reconciliation results
#[derive(Clone)]
pub struct ResultCache {
    inner: Cache<CacheKey, CachedStatuses>,
}

impl ResultCache {
    pub fn new(ttl: Duration, capacity: u64) -> Self {
        Self {
            inner: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(capacity)
                .build(),
        }
    }

    /// Return the cached value for `key`, or run `compute` and cache its
    /// success
    pub async fn get_or_compute<F>(
        &self,
        key: CacheKey,
        compute: F,
    ) -> Result<CachedStatuses, ToolError>
    where
        F: Future<Output = Result<Vec<DependencyStatus>, ToolError>>,
    {
        self.inner
            .try_get_with(key, async move { compute.await.map(Arc::new) })
            .await
            .map_err(|e: Arc<ToolError>| (*e).clone())
    }

    /// Cached value for `key`, if present and fresh
    pub async fn get(&self, key: &CacheKey) -> Option<CachedStatuses> {
        self.inner.get(key).await
    }

    /// Drop the entry for `key`
    pub async fn invalidate(&self, key: &CacheKey) {
        self.inner.invalidate(key).await;
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL, DEFAULT_CAPACITY)
    }
}
