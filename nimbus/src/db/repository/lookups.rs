use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use libsql::{params, Connection};

use crate::db::schema::fold_location;
use crate::error::{NimbusError, Result};
use crate::models::{LookupId, SavedLookup};

const SELECT_COLUMNS: &str = "id, location_query, start_date, end_date, weather_data, notes, \
                              created_at, updated_at";

pub struct LookupRepository;

impl LookupRepository {
    pub async fn create(conn: &Connection, lookup: &SavedLookup) -> Result<()> {
        conn.execute(
            r#"
            INSERT INTO saved_lookups (
                id, location_query, location_query_folded, start_date, end_date,
                weather_data, notes, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
            params![
                lookup.id.as_str(),
                lookup.location_query.clone(),
                fold_location(&lookup.location_query),
                format_date(lookup.start_date),
                format_date(lookup.end_date),
                serde_json::to_string(&lookup.weather_data)?,
                lookup.notes.clone(),
                format_timestamp(lookup.created_at),
                lookup.updated_at.map(format_timestamp),
            ],
        )
        .await?;

        Ok(())
    }

    pub async fn get_by_id(conn: &Connection, id: &LookupId) -> Result<Option<SavedLookup>> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM saved_lookups WHERE id = ?1");
        let mut rows = conn.query(&sql, params![id.as_str()]).await?;

        if let Some(row) = rows.next().await? {
            Ok(Some(Self::row_to_lookup(&row)?))
        } else {
            Ok(None)
        }
    }

    /// Newest first. `location` narrows to records whose query contains it,
    /// ignoring case. Both sides are folded in Rust so non-ASCII letters match.
    pub async fn list(conn: &Connection, location: Option<&str>) -> Result<Vec<SavedLookup>> {
        let filter = location
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(fold_location);

        let mut rows = match filter {
            Some(needle) => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM saved_lookups \
                     WHERE instr(location_query_folded, ?1) > 0 \
                     ORDER BY created_at DESC, rowid DESC"
                );
                conn.query(&sql, params![needle.as_str()]).await?
            }
            None => {
                let sql = format!(
                    "SELECT {SELECT_COLUMNS} FROM saved_lookups \
                     ORDER BY created_at DESC, rowid DESC"
                );
                conn.query(&sql, ()).await?
            }
        };

        let mut results = Vec::new();
        while let Some(row) = rows.next().await? {
            results.push(Self::row_to_lookup(&row)?);
        }
        Ok(results)
    }

    /// Returns `false` when no record has this id.
    pub async fn update_notes(
        conn: &Connection,
        id: &LookupId,
        notes: &str,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let rows_affected = conn
            .execute(
                "UPDATE saved_lookups SET notes = ?2, updated_at = ?3 WHERE id = ?1",
                params![id.as_str(), notes, format_timestamp(updated_at)],
            )
            .await?;

        Ok(rows_affected > 0)
    }

    pub async fn delete(conn: &Connection, id: &LookupId) -> Result<bool> {
        let rows_affected = conn
            .execute("DELETE FROM saved_lookups WHERE id = ?1", params![id.as_str()])
            .await?;

        Ok(rows_affected > 0)
    }

    fn row_to_lookup(row: &libsql::Row) -> Result<SavedLookup> {
        let id: String = row.get(0)?;
        Ok(SavedLookup {
            id: LookupId::parse(&id)
                .map_err(|_| NimbusError::Internal(format!("Stored lookup has bad id `{id}`")))?,
            location_query: row.get(1)?,
            start_date: parse_date(&row.get::<String>(2)?)?,
            end_date: parse_date(&row.get::<String>(3)?)?,
            weather_data: serde_json::from_str(&row.get::<String>(4)?)?,
            notes: row.get(5)?,
            created_at: parse_timestamp(&row.get::<String>(6)?)?,
            updated_at: row
                .get::<Option<String>>(7)?
                .map(|ts| parse_timestamp(&ts))
                .transpose()?,
        })
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|e| NimbusError::Internal(format!("Stored date `{raw}` is invalid: {e}")))
}

/// Fixed-width UTC timestamps so lexical order matches chronological order.
fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| NimbusError::Internal(format!("Stored timestamp `{raw}` is invalid: {e}")))
}
