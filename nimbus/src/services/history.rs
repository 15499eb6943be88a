use std::sync::Arc;

use chrono::Utc;

use crate::db::DatabaseBackend;
use crate::error::{NimbusError, Result};
use crate::models::{
    average_high, forecast_in_range, snapshot_forecast, snapshot_location_name, LookupId,
    NewSavedLookup, SavedLookup,
};
use crate::weather::ForecastDay;

const NOT_FOUND_MESSAGE: &str = "History item not found.";

/// Date-filtered view of a saved snapshot.
#[derive(Debug, Clone)]
pub struct ForecastSlice {
    pub lookup: SavedLookup,
    pub location: String,
    pub average_high_c: Option<i64>,
    pub forecast: Vec<ForecastDay>,
}

#[derive(Clone)]
pub struct HistoryService {
    db: Arc<dyn DatabaseBackend>,
}

impl HistoryService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    pub async fn create(&self, new: NewSavedLookup) -> Result<SavedLookup> {
        let lookup = SavedLookup::from_new(new);
        self.db.create_lookup(&lookup).await?;
        tracing::info!(id = %lookup.id, location = %lookup.location_query, "Saved lookup");
        Ok(lookup)
    }

    pub async fn list(&self, location: Option<&str>) -> Result<Vec<SavedLookup>> {
        self.db.list_lookups(location).await
    }

    pub async fn get(&self, raw_id: &str) -> Result<SavedLookup> {
        let id = LookupId::parse(raw_id)?;
        self.db
            .get_lookup(&id)
            .await?
            .ok_or_else(|| NimbusError::NotFound(NOT_FOUND_MESSAGE.to_string()))
    }

    /// Replace the notes of one record. Nothing else on the record changes.
    pub async fn update_notes(&self, raw_id: &str, notes: Option<String>) -> Result<()> {
        let Some(notes) = notes else {
            return Err(NimbusError::Validation(
                "No 'notes' field provided for update.".to_string(),
            ));
        };
        let id = LookupId::parse(raw_id)?;

        if !self.db.update_notes(&id, &notes, Utc::now()).await? {
            return Err(NimbusError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        Ok(())
    }

    pub async fn delete(&self, raw_id: &str) -> Result<LookupId> {
        let id = LookupId::parse(raw_id)?;
        if !self.db.delete_lookup(&id).await? {
            return Err(NimbusError::NotFound(NOT_FOUND_MESSAGE.to_string()));
        }
        tracing::info!(id = %id, "Deleted lookup");
        Ok(id)
    }

    /// The snapshot's forecast days inside the record's saved date range.
    ///
    /// A snapshot without a readable forecast, or a range the snapshot does
    /// not cover, is reported as not-found with an explanatory message.
    pub async fn forecast_slice(&self, raw_id: &str) -> Result<ForecastSlice> {
        let lookup = self.get(raw_id).await?;

        let days = snapshot_forecast(&lookup.weather_data).ok_or_else(|| {
            NimbusError::NotFound("Forecast data not available for this record.".to_string())
        })?;

        let forecast = forecast_in_range(&days, lookup.start_date, lookup.end_date);
        if forecast.is_empty() {
            return Err(NimbusError::NotFound(format!(
                "No forecast data found between {} and {} for this record.",
                lookup.start_date.format("%b %-d, %Y"),
                lookup.end_date.format("%b %-d, %Y"),
            )));
        }

        let location = snapshot_location_name(&lookup.weather_data)
            .map(str::to_string)
            .unwrap_or_else(|| lookup.location_query.clone());

        Ok(ForecastSlice {
            average_high_c: average_high(&days),
            location,
            forecast,
            lookup,
        })
    }
}
