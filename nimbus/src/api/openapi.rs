use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use super::dto;
use super::handlers;
use crate::models;
use crate::weather;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Nimbus API",
        version = "1.0.0",
        description = "Weather lookup proxy with a saved-forecast history.",
    ),
    paths(
        handlers::health::health_check,
        handlers::weather::get_weather,
        handlers::history::create_lookup,
        handlers::history::list_lookups,
        handlers::history::get_lookup,
        handlers::history::get_forecast_slice,
        handlers::history::update_notes,
        handlers::history::delete_lookup,
    ),
    components(schemas(
        // Weather
        weather::WeatherReport,
        weather::LocationSummary,
        weather::CurrentConditions,
        weather::ForecastDay,
        weather::Condition,
        // History
        models::SavedLookup,
        dto::history::CreateLookupRequest,
        dto::history::UpdateNotesRequest,
        dto::history::CreateLookupResponse,
        dto::history::MessageResponse,
        dto::history::DeleteLookupResponse,
        dto::history::ForecastSliceResponse,
        // Health
        handlers::health::HealthData,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "weather", description = "Current conditions and forecast from the upstream provider"),
        (name = "history", description = "Saved forecast snapshots and notes"),
    ),
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
