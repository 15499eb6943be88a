use serde::Deserialize;

/// Query parameters for `GET /api/weather`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
pub struct WeatherQuery {
    /// City name, postal code, or `lat,lon` pair.
    pub location: Option<String>,
}
