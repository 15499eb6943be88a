use std::sync::Arc;

use libsql::{Builder, Connection};

use crate::config::DatabaseConfig;
use crate::error::Result;

use super::schema;

/// Where the store lives, read off the connection string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StoreKind {
    /// `:memory:`. The data lives exactly as long as one connection does.
    Memory,
    LocalFile,
    Remote,
    /// Remote primary mirrored into a local file.
    Replica,
}

impl StoreKind {
    fn detect(config: &DatabaseConfig) -> Self {
        let url = config.url.as_str();
        if url.starts_with("libsql://") || url.starts_with("https://") {
            if config.local_path.is_some() {
                StoreKind::Replica
            } else {
                StoreKind::Remote
            }
        } else if local_path(url) == ":memory:" {
            StoreKind::Memory
        } else {
            StoreKind::LocalFile
        }
    }
}

/// Process-wide store handle. Opened once at startup and shared by every
/// request through [`crate::db::LibSqlBackend`].
#[derive(Clone)]
pub struct Database {
    db: Arc<libsql::Database>,
    kind: StoreKind,
    /// Set for in-memory stores, where every fresh connection would see an
    /// empty database.
    shared: Option<Connection>,
    busy_timeout_ms: u64,
    synchronous: &'static str,
}

impl Database {
    pub async fn new(config: &DatabaseConfig) -> Result<Self> {
        let kind = StoreKind::detect(config);
        let token = config.auth_token.clone().unwrap_or_default();

        let db = match kind {
            StoreKind::Replica => {
                let replica_path = config.local_path.clone().unwrap_or_default();
                Builder::new_remote_replica(replica_path, config.url.clone(), token)
                    .build()
                    .await?
            }
            StoreKind::Remote => Builder::new_remote(config.url.clone(), token).build().await?,
            StoreKind::Memory | StoreKind::LocalFile => {
                Builder::new_local(local_path(&config.url)).build().await?
            }
        };

        let shared = match kind {
            StoreKind::Memory => Some(db.connect()?),
            _ => None,
        };

        let database = Self {
            db: Arc::new(db),
            kind,
            shared,
            busy_timeout_ms: config.busy_timeout_ms,
            synchronous: config.synchronous.as_sql(),
        };

        let conn = database.connect().await?;
        if kind == StoreKind::LocalFile {
            set_pragma(&conn, "journal_mode", config.journal_mode.as_sql()).await;
        }
        schema::init_schema(&conn).await?;

        tracing::info!(url = %redact_url(&config.url), kind = ?kind, "Database ready");

        Ok(database)
    }

    pub(crate) fn kind(&self) -> StoreKind {
        self.kind
    }

    /// A connection for one store operation. Local files get the
    /// per-connection pragmas applied; in-memory stores hand out the shared
    /// connection.
    pub async fn connect(&self) -> Result<Connection> {
        if let Some(conn) = &self.shared {
            return Ok(conn.clone());
        }

        let conn = self.db.connect()?;
        if self.kind == StoreKind::LocalFile {
            set_pragma(&conn, "busy_timeout", &self.busy_timeout_ms.to_string()).await;
            set_pragma(&conn, "synchronous", self.synchronous).await;
        }
        Ok(conn)
    }

    /// Pull remote frames into the local replica. Other store kinds have
    /// nothing to sync. A failed replica sync is returned to the caller.
    pub async fn sync(&self) -> Result<()> {
        if self.kind != StoreKind::Replica {
            return Ok(());
        }
        let replicated = self.db.sync().await?;
        tracing::info!(?replicated, "Replica synced");
        Ok(())
    }
}

/// Pragma failures degrade performance, not correctness, so they only warn.
async fn set_pragma(conn: &Connection, name: &str, value: &str) {
    if let Err(error) = conn.execute_batch(&format!("PRAGMA {name} = {value}")).await {
        tracing::warn!(pragma = name, value, error = %error, "Failed to set SQLite pragma");
    }
}

fn local_path(url: &str) -> &str {
    url.strip_prefix("file:").unwrap_or(url)
}

/// Strip query strings (which may carry tokens) before logging a URL.
fn redact_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}
