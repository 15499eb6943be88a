use reqwest::StatusCode;

use super::types::{
    CurrentConditions, ForecastDay, LocationSummary, ProviderErrorEnvelope,
    ProviderForecastResponse, WeatherReport, NO_MATCHING_LOCATION,
};
use crate::error::NimbusError;

/// Translate the provider payload into the proxy's response schema.
pub fn reshape(response: ProviderForecastResponse) -> WeatherReport {
    let ProviderForecastResponse {
        location,
        current,
        forecast,
    } = response;

    WeatherReport {
        location: LocationSummary {
            name: location.name,
            country: location.country,
            lat: location.lat,
            lon: location.lon,
        },
        current: CurrentConditions {
            temp_c: current.temp_c,
            condition: current.condition,
            humidity: current.humidity,
            wind_kph: current.wind_kph,
            feelslike_c: current.feelslike_c,
        },
        forecast: forecast
            .forecastday
            .into_iter()
            .map(|day| ForecastDay {
                date: day.date,
                max_temp_c: day.day.maxtemp_c,
                min_temp_c: day.day.mintemp_c,
                condition: day.day.condition,
            })
            .collect(),
    }
}

/// Turn a non-success provider response into one of the error kinds.
///
/// Only the provider's "no matching location" code is attributed to the
/// caller; every other failure is an upstream error.
pub fn classify_upstream_failure(status: StatusCode, body: &str, location: &str) -> NimbusError {
    let provider_error = serde_json::from_str::<ProviderErrorEnvelope>(body).ok();

    match provider_error {
        Some(envelope) if envelope.error.code == NO_MATCHING_LOCATION => NimbusError::NotFound(
            format!("Location not found for \"{location}\". Please refine your search."),
        ),
        Some(envelope) => NimbusError::Upstream(format!(
            "provider returned {status} (code {}): {}",
            envelope.error.code, envelope.error.message
        )),
        None => NimbusError::Upstream(format!("provider returned {status}: {body}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use crate::weather::types::Condition;

    fn provider_payload(days: u32) -> serde_json::Value {
        let forecastday: Vec<_> = (0..days)
            .map(|i| {
                json!({
                    "date": format!("2024-01-{:02}", i + 1),
                    "date_epoch": 1704067200 + i * 86400,
                    "day": {
                        "maxtemp_c": 10.0 + f64::from(i),
                        "mintemp_c": 2.0 + f64::from(i),
                        "avgtemp_c": 6.0,
                        "condition": { "text": "Sunny", "icon": "//cdn/113.png", "code": 1000 }
                    },
                    "astro": { "sunrise": "08:06 AM" },
                    "hour": []
                })
            })
            .collect();

        json!({
            "location": {
                "name": "London",
                "region": "City of London, Greater London",
                "country": "United Kingdom",
                "lat": 51.52,
                "lon": -0.11,
                "tz_id": "Europe/London"
            },
            "current": {
                "temp_c": 7.0,
                "temp_f": 44.6,
                "condition": { "text": "Partly cloudy", "icon": "//cdn/116.png", "code": 1003 },
                "humidity": 81,
                "wind_kph": 15.1,
                "feelslike_c": 4.2
            },
            "forecast": { "forecastday": forecastday }
        })
    }

    #[test]
    fn reshape_keeps_only_contract_fields() {
        let response: ProviderForecastResponse =
            serde_json::from_value(provider_payload(2)).unwrap();
        let report = reshape(response);

        assert_eq!(
            report.location,
            LocationSummary {
                name: "London".to_string(),
                country: "United Kingdom".to_string(),
                lat: 51.52,
                lon: -0.11,
            }
        );
        assert_eq!(report.current.temp_c, 7.0);
        assert_eq!(report.current.humidity, 81.0);
        assert_eq!(report.current.wind_kph, 15.1);
        assert_eq!(report.current.feelslike_c, 4.2);
        assert_eq!(
            report.current.condition,
            Condition {
                text: "Partly cloudy".to_string(),
                icon: "//cdn/116.png".to_string(),
                code: Some(1003),
            }
        );

        let serialized = serde_json::to_value(&report).unwrap();
        assert!(serialized["location"].get("region").is_none());
        assert!(serialized["current"].get("temp_f").is_none());
        assert!(serialized["forecast"][0].get("astro").is_none());
    }

    #[test]
    fn reshape_preserves_day_order_and_count() {
        let response: ProviderForecastResponse =
            serde_json::from_value(provider_payload(14)).unwrap();
        let report = reshape(response);

        assert_eq!(report.forecast.len(), 14);
        assert!(report
            .forecast
            .windows(2)
            .all(|pair| pair[0].date < pair[1].date));
        assert_eq!(
            report.forecast[0].date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
        assert_eq!(report.forecast[13].max_temp_c, 23.0);
        assert_eq!(report.forecast[13].min_temp_c, 15.0);
    }

    #[test]
    fn no_matching_location_is_not_found() {
        let body = r#"{"error":{"code":1006,"message":"No matching location found."}}"#;
        let err = classify_upstream_failure(StatusCode::BAD_REQUEST, body, "Atlantis");
        match err {
            NimbusError::NotFound(msg) => assert!(msg.contains("\"Atlantis\"")),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn auth_and_quota_failures_are_upstream() {
        let body = r#"{"error":{"code":2006,"message":"API key is invalid."}}"#;
        let err = classify_upstream_failure(StatusCode::UNAUTHORIZED, body, "London");
        assert!(matches!(err, NimbusError::Upstream(_)));

        let body = r#"{"error":{"code":2007,"message":"API key has exceeded calls per month quota."}}"#;
        let err = classify_upstream_failure(StatusCode::FORBIDDEN, body, "London");
        assert!(matches!(err, NimbusError::Upstream(_)));
    }

    #[test]
    fn unparsable_error_body_is_upstream() {
        let err = classify_upstream_failure(StatusCode::BAD_GATEWAY, "<html>oops</html>", "Paris");
        assert!(matches!(err, NimbusError::Upstream(_)));
    }
}
