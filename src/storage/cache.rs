//! Persisted employee directory with a freshness window

use chrono::{DateTime, TimeDelta, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::JsonFile;
use crate::models::{CacheSnapshot, EmployeeKinds};
use crate::upstream::{Aggregator, EmployeeSource, UpstreamError};

/// Default freshness window
pub const DEFAULT_FRESHNESS: Duration = Duration::from_secs(6 * 60 * 60);

/// Serves the cached directory and refreshes it from upstream when stale
///
/// Refreshes are serialized: the check, the fetch and the write all happen
/// under one lock, so concurrent callers never fetch twice for one window.
pub struct CacheStore {
    file: JsonFile,
    source: Arc<dyn EmployeeSource>,
    kinds: Vec<String>,
    page_limit: u32,
    freshness: TimeDelta,
    refresh_lock: Mutex<()>,
}

impl CacheStore {
    pub fn new(
        path: impl Into<PathBuf>,
        source: Arc<dyn EmployeeSource>,
        kinds: &EmployeeKinds,
        page_limit: u32,
        freshness: Duration,
    ) -> Self {
        Self {
            file: JsonFile::new(path),
            source,
            kinds: kinds.as_slice().to_vec(),
            page_limit,
            freshness: TimeDelta::from_std(freshness).unwrap_or(TimeDelta::MAX),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Last persisted snapshot, or an empty one when missing or unreadable
    pub async fn load(&self) -> CacheSnapshot {
        self.file.load_or_default().await
    }

    /// Whether `snapshot` can be served without contacting upstream
    pub fn is_fresh(&self, snapshot: &CacheSnapshot, now: DateTime<Utc>) -> bool {
        let Some(updated) = snapshot.updated_at_utc() else {
            return false;
        };
        let has_type_lists = self.kinds.iter().all(|k| snapshot.by_type.contains_key(k));

        now.signed_duration_since(updated) < self.freshness
            && !snapshot.items.is_empty()
            && has_type_lists
    }

    /// Serve the cached snapshot if fresh, otherwise rebuild it
    pub async fn refresh(&self, force: bool) -> Result<CacheSnapshot, UpstreamError> {
        self.refresh_at(force, Utc::now()).await
    }

    /// [`refresh`](Self::refresh) with an explicit clock
    ///
    /// On upstream failure nothing is written and the error is returned.
    /// A failed write is logged; the fresh snapshot is still returned.
    pub async fn refresh_at(
        &self,
        force: bool,
        now: DateTime<Utc>,
    ) -> Result<CacheSnapshot, UpstreamError> {
        let _guard = self.refresh_lock.lock().await;

        let current = self.load().await;
        if !force && self.is_fresh(&current, now) {
            tracing::debug!(updated_at = current.updated_at, "Serving cached directory");
            return Ok(current);
        }

        tracing::info!(force, kinds = ?self.kinds, "Refreshing employee directory");
        let aggregated = Aggregator::new(&*self.source, self.page_limit)
            .collect(&self.kinds)
            .await?;

        let snapshot = CacheSnapshot {
            updated_at: now.timestamp_millis(),
            types: self.kinds.clone(),
            counts: aggregated.counts,
            by_type: aggregated.by_type,
            items: aggregated.merged,
        };

        if let Err(e) = self.file.save(&snapshot).await {
            tracing::warn!(error = %e, "Failed to persist employee cache");
        }

        tracing::info!(items = snapshot.items.len(), "Employee directory refreshed");
        Ok(snapshot)
    }
}
