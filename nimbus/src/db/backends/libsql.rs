use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::db::connection::Database;
use crate::db::repository::LookupRepository;
use crate::db::traits::{DatabaseBackend, HistoryStore};
use crate::error::Result;
use crate::models::{LookupId, SavedLookup};

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryStore for LibSqlBackend {
    async fn create_lookup(&self, lookup: &SavedLookup) -> Result<()> {
        let conn = self.db.connect().await?;
        LookupRepository::create(&conn, lookup).await
    }
    async fn get_lookup(&self, id: &LookupId) -> Result<Option<SavedLookup>> {
        let conn = self.db.connect().await?;
        LookupRepository::get_by_id(&conn, id).await
    }
    async fn list_lookups(&self, location: Option<&str>) -> Result<Vec<SavedLookup>> {
        let conn = self.db.connect().await?;
        LookupRepository::list(&conn, location).await
    }
    async fn update_notes(
        &self,
        id: &LookupId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let conn = self.db.connect().await?;
        LookupRepository::update_notes(&conn, id, notes, updated_at).await
    }
    async fn delete_lookup(&self, id: &LookupId) -> Result<bool> {
        let conn = self.db.connect().await?;
        LookupRepository::delete(&conn, id).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn ping(&self) -> Result<()> {
        let conn = self.db.connect().await?;
        let mut rows = conn.query("SELECT 1", ()).await?;
        rows.next().await?;
        Ok(())
    }

    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }

    /// Final replica sync. An error here means the replica may be behind
    /// the primary and is returned to the caller.
    async fn close(&self) -> Result<()> {
        self.sync().await?;
        tracing::info!("Database closed");
        Ok(())
    }
}
