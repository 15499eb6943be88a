//! Wire contracts on both sides of the weather proxy.
//!
//! The `Provider*` types mirror the subset of the upstream `forecast.json`
//! payload the proxy reads. Unknown upstream fields are ignored. The
//! [`WeatherReport`] family is the reshaped schema returned to clients and
//! captured inside saved lookups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Provider error code for "No matching location found".
pub const NO_MATCHING_LOCATION: i64 = 1006;

/// Condition descriptor passed through verbatim from the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Condition {
    pub text: String,
    pub icon: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
}

// ---------------------------------------------------------------------------
// Upstream payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderForecastResponse {
    pub location: ProviderLocation,
    pub current: ProviderCurrent,
    pub forecast: ProviderForecast,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderLocation {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderCurrent {
    pub temp_c: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub feelslike_c: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderForecast {
    pub forecastday: Vec<ProviderForecastDay>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderForecastDay {
    pub date: NaiveDate,
    pub day: ProviderDay,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderDay {
    pub maxtemp_c: f64,
    pub mintemp_c: f64,
    pub condition: Condition,
}

/// Error body the provider sends alongside 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorEnvelope {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderErrorDetail {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

// ---------------------------------------------------------------------------
// Reshaped payload
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct WeatherReport {
    pub location: LocationSummary,
    pub current: CurrentConditions,
    /// One entry per returned day, ascending by date.
    pub forecast: Vec<ForecastDay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LocationSummary {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CurrentConditions {
    pub temp_c: f64,
    pub condition: Condition,
    pub humidity: f64,
    pub wind_kph: f64,
    pub feelslike_c: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ForecastDay {
    #[schema(value_type = String, format = Date)]
    pub date: NaiveDate,
    pub max_temp_c: f64,
    pub min_temp_c: f64,
    pub condition: Condition,
}
