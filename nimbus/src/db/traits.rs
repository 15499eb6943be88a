use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::models::{LookupId, SavedLookup};

/// Persistence for saved lookups. Each method is a single store operation.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    async fn create_lookup(&self, lookup: &SavedLookup) -> Result<()>;
    async fn get_lookup(&self, id: &LookupId) -> Result<Option<SavedLookup>>;
    /// Newest first, optionally narrowed by a case-insensitive substring of
    /// the location query.
    async fn list_lookups(&self, location: Option<&str>) -> Result<Vec<SavedLookup>>;
    /// Returns `false` when no record matched.
    async fn update_notes(
        &self,
        id: &LookupId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;
    /// Returns `false` when no record matched.
    async fn delete_lookup(&self, id: &LookupId) -> Result<bool>;
}

/// A complete store backend: the history operations plus lifecycle hooks.
#[async_trait]
pub trait DatabaseBackend: HistoryStore {
    /// Round-trip check used by the health endpoint.
    async fn ping(&self) -> Result<()>;

    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;

    /// Flush and release the store at shutdown.
    async fn close(&self) -> Result<()>;
}
