//! Weather proxy handler.

use axum::extract::State;
use axum::Json;
use axum_extra::extract::Query;

use crate::api::dto::WeatherQuery;
use crate::api::AppState;
use crate::error::SummarizedError;
use crate::weather::WeatherReport;

const FAILURE_SUMMARY: &str = "An unexpected error occurred while fetching weather data.";

/// `GET /api/weather?location=`
#[utoipa::path(
    get,
    path = "/api/weather",
    tag = "weather",
    operation_id = "weather.get",
    params(WeatherQuery),
    responses(
        (status = 200, description = "Current conditions and forecast", body = WeatherReport),
        (status = 400, description = "Missing location parameter"),
        (status = 404, description = "Provider found no matching location"),
        (status = 500, description = "Provider or network failure"),
    )
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, SummarizedError> {
    let location = query.location.unwrap_or_default();

    state
        .weather
        .fetch(&location)
        .await
        .map(Json)
        .map_err(|e| e.with_summary(FAILURE_SUMMARY))
}
