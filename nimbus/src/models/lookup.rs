use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{NimbusError, Result};

const ID_LEN: usize = 21;

/// Identifier of a saved lookup: a 21-character nanoid over `[A-Za-z0-9_-]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LookupId(String);

impl LookupId {
    pub fn generate() -> Self {
        Self(nanoid!())
    }

    /// Check `raw` against the identifier format. A malformed id is a caller
    /// bug and is reported as [`NimbusError::InvalidId`], never as not-found.
    pub fn parse(raw: &str) -> Result<Self> {
        let well_formed = raw.len() == ID_LEN
            && raw
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');

        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(NimbusError::InvalidId(raw.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LookupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for LookupId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One saved forecast snapshot plus the user's notes.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SavedLookup {
    #[serde(rename = "_id")]
    #[schema(value_type = String)]
    pub id: LookupId,
    pub location_query: String,
    #[serde(with = "calendar_date")]
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    /// Weather report captured at save time. Never refreshed.
    #[schema(value_type = Object)]
    pub weather_data: serde_json::Value,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields supplied by the caller when saving a lookup.
#[derive(Debug, Clone)]
pub struct NewSavedLookup {
    pub location_query: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub weather_data: serde_json::Value,
    pub notes: Option<String>,
}

impl SavedLookup {
    pub fn from_new(new: NewSavedLookup) -> Self {
        Self {
            id: LookupId::generate(),
            location_query: new.location_query,
            start_date: new.start_date,
            end_date: new.end_date,
            weather_data: new.weather_data,
            notes: new.notes.unwrap_or_default(),
            created_at: Utc::now(),
            updated_at: None,
        }
    }
}

/// Parse a calendar date from either `YYYY-MM-DD` or a timestamp. Timestamps
/// are reduced to their UTC date.
pub fn parse_calendar_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc).date_naive());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
}

/// Serde adapter: writes `YYYY-MM-DD`, reads anything [`parse_calendar_date`]
/// accepts.
pub mod calendar_date {
    use super::*;

    pub fn serialize<S: Serializer>(
        date: &NaiveDate,
        serializer: S,
    ) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> std::result::Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_calendar_date(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid calendar date `{raw}`")))
    }
}
