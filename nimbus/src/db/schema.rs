use libsql::{params, Connection};

use crate::error::Result;

pub async fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- Saved weather lookups
        CREATE TABLE IF NOT EXISTS saved_lookups (
            id TEXT PRIMARY KEY,
            location_query TEXT NOT NULL,
            location_query_folded TEXT NOT NULL DEFAULT '',
            start_date TEXT NOT NULL,
            end_date TEXT NOT NULL,
            weather_data TEXT NOT NULL,
            notes TEXT NOT NULL DEFAULT '',
            created_at TEXT NOT NULL,
            updated_at TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_saved_lookups_created_at ON saved_lookups(created_at);
        "#,
    )
    .await?;

    migrate_folded_location_column(conn).await?;

    Ok(())
}

/// Lower-case copy of a location query used by the history filter. SQLite's
/// `lower()` only folds ASCII, so folding happens here instead.
pub fn fold_location(raw: &str) -> String {
    raw.to_lowercase()
}

async fn migrate_folded_location_column(conn: &Connection) -> Result<()> {
    let column_exists: bool = conn
        .query(
            "SELECT COUNT(*) FROM pragma_table_info('saved_lookups') WHERE name='location_query_folded'",
            (),
        )
        .await?
        .next()
        .await?
        .map(|row| row.get::<i64>(0).unwrap_or(0) > 0)
        .unwrap_or(false);

    if column_exists {
        return Ok(());
    }

    tracing::info!("Migrating saved_lookups table: adding location_query_folded column");
    conn.execute(
        "ALTER TABLE saved_lookups ADD COLUMN location_query_folded TEXT NOT NULL DEFAULT ''",
        (),
    )
    .await?;

    let mut rows = conn
        .query("SELECT id, location_query FROM saved_lookups", ())
        .await?;
    let mut pending = Vec::new();
    while let Some(row) = rows.next().await? {
        let id: String = row.get(0)?;
        let location: String = row.get(1)?;
        pending.push((id, fold_location(&location)));
    }

    for (id, folded) in &pending {
        conn.execute(
            "UPDATE saved_lookups SET location_query_folded = ?2 WHERE id = ?1",
            params![id.as_str(), folded.as_str()],
        )
        .await?;
    }
    tracing::info!(rows = pending.len(), "Migration complete: location_query_folded backfilled");

    Ok(())
}
