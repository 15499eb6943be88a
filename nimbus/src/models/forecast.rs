use chrono::NaiveDate;

use crate::weather::ForecastDay;

/// Days shown in the history summary's average high.
const SUMMARY_DAYS: usize = 5;

/// Forecast days whose date lies in `[start, end]`, inclusive, in their
/// original order.
///
/// An empty result means the snapshot does not cover the requested range.
/// Callers must report that explicitly instead of rendering nothing.
pub fn forecast_in_range(days: &[ForecastDay], start: NaiveDate, end: NaiveDate) -> Vec<ForecastDay> {
    days.iter()
        .filter(|day| day.date >= start && day.date <= end)
        .cloned()
        .collect()
}

/// Pull the forecast array out of a stored weather snapshot.
///
/// Snapshots are opaque client-supplied JSON, so a missing or unreadable
/// `forecast` yields `None` rather than an error.
pub fn snapshot_forecast(weather_data: &serde_json::Value) -> Option<Vec<ForecastDay>> {
    let forecast = weather_data.get("forecast")?;
    serde_json::from_value(forecast.clone()).ok()
}

/// Display name of a snapshot's location, if it recorded one.
pub fn snapshot_location_name(weather_data: &serde_json::Value) -> Option<&str> {
    weather_data
        .get("location")
        .and_then(|location| location.get("name"))
        .and_then(|name| name.as_str())
        .filter(|name| !name.is_empty())
}

/// Rounded mean of the daily highs over the first five days.
pub fn average_high(days: &[ForecastDay]) -> Option<i64> {
    let window = &days[..days.len().min(SUMMARY_DAYS)];
    if window.is_empty() {
        return None;
    }
    let sum: f64 = window.iter().map(|day| day.max_temp_c).sum();
    Some((sum / window.len() as f64).round() as i64)
}
