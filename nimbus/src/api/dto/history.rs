//! Saved-lookup request/response DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::error::{NimbusError, Result};
use crate::models::{calendar_date, parse_calendar_date, NewSavedLookup, SavedLookup};
use crate::weather::ForecastDay;

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Request body for `POST /api/history`.
///
/// Every field is optional at the serde level so that absent fields surface as
/// one validation error listing all of them, rather than a parse failure on
/// the first.
#[derive(Debug, Clone, Default, Deserialize, Validate, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLookupRequest {
    /// Location as the user typed it.
    #[validate(required, length(min = 1))]
    pub location_query: Option<String>,
    /// First day of interest, `YYYY-MM-DD` or an ISO timestamp.
    #[validate(required, length(min = 1))]
    pub start_date: Option<String>,
    /// Last day of interest, `YYYY-MM-DD` or an ISO timestamp.
    #[validate(required, length(min = 1))]
    pub end_date: Option<String>,
    /// Weather report captured by the client, stored verbatim.
    #[validate(required)]
    #[schema(value_type = Object)]
    pub weather_data: Option<serde_json::Value>,
    pub notes: Option<String>,
}

impl CreateLookupRequest {
    /// Presence checks, then date parsing.
    pub fn into_new_lookup(self) -> Result<NewSavedLookup> {
        if let Err(errors) = self.validate() {
            return Err(NimbusError::Validation(format!(
                "Missing required fields: {}.",
                missing_fields(&errors).join(", ")
            )));
        }

        let (Some(location_query), Some(start_date), Some(end_date), Some(weather_data)) = (
            self.location_query,
            self.start_date,
            self.end_date,
            self.weather_data,
        ) else {
            return Err(NimbusError::Validation(
                "Missing required fields: locationQuery, startDate, endDate, or weatherData."
                    .to_string(),
            ));
        };

        Ok(NewSavedLookup {
            location_query,
            start_date: parse_date_field("startDate", &start_date)?,
            end_date: parse_date_field("endDate", &end_date)?,
            weather_data,
            notes: self.notes,
        })
    }
}

/// Request body for `PATCH /api/history/{id}`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateNotesRequest {
    /// Replacement notes. May be empty, must be present.
    pub notes: Option<String>,
}

/// Query parameters for `GET /api/history`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct ListHistoryQuery {
    /// Case-insensitive substring of the saved location query.
    pub location: Option<String>,
}

fn parse_date_field(field: &str, raw: &str) -> Result<NaiveDate> {
    parse_calendar_date(raw)
        .ok_or_else(|| NimbusError::Validation(format!("Invalid {field}: `{raw}` is not a date.")))
}

/// Wire names of the failing fields, sorted for a stable message.
fn missing_fields(errors: &ValidationErrors) -> Vec<String> {
    let mut fields: Vec<String> = errors
        .field_errors()
        .keys()
        .map(|field| to_camel_case(field))
        .collect();
    fields.sort();
    fields
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper_next = false;
    for c in field.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// Response for `POST /api/history`: the stored record plus a message.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct CreateLookupResponse {
    pub message: String,
    #[serde(flatten)]
    pub lookup: SavedLookup,
}

impl From<SavedLookup> for CreateLookupResponse {
    fn from(lookup: SavedLookup) -> Self {
        Self {
            message: "Weather history saved.".to_string(),
            lookup,
        }
    }
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

/// Response for `DELETE /api/history/{id}`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct DeleteLookupResponse {
    pub message: String,
    pub id: String,
}

/// Response for `GET /api/history/{id}/forecast`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForecastSliceResponse {
    #[serde(rename = "_id")]
    pub id: String,
    /// Snapshot location name, or the saved query when the snapshot has none.
    pub location: String,
    #[serde(with = "calendar_date")]
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    /// Rounded mean high of the first five snapshot days.
    pub average_high_c: Option<i64>,
    pub forecast: Vec<ForecastDay>,
}
