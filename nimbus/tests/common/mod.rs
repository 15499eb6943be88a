#![allow(dead_code)]

use std::sync::{Arc, Once};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, NaiveDate};
use serde_json::{json, Value};
use tower::ServiceExt;

use nimbus::api::{create_router, AppState};
use nimbus::config::{Config, DatabaseConfig, ServerConfig, WeatherConfig};
use nimbus::db::{Database, DatabaseBackend, LibSqlBackend};
use nimbus::weather::WeatherClient;

static INIT: Once = Once::new();

/// Initialize tracing subscriber once for tests
pub fn init_test_logger() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Router over a fresh on-disk store. The store lives as long as `_dir`.
pub struct TestApp {
    pub router: Router,
    _dir: tempfile::TempDir,
}

impl TestApp {
    pub async fn new(weather_base_url: &str, forecast_days: u8) -> Self {
        init_test_logger();

        let dir = tempfile::tempdir().expect("tempdir");
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: format!("file:{}", dir.path().join("nimbus.db").display()),
                ..DatabaseConfig::default()
            },
            weather: WeatherConfig {
                api_key: "test-key".to_string(),
                base_url: weather_base_url.to_string(),
                forecast_days,
                ..WeatherConfig::default()
            },
        };

        let raw_db = Database::new(&config.database).await.expect("open db");
        let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));
        let weather = WeatherClient::new(&config.weather).expect("weather client");

        Self {
            router: create_router(AppState::new(db, weather)),
            _dir: dir,
        }
    }

    /// An app whose weather upstream is unreachable.
    pub async fn offline() -> Self {
        Self::new("http://127.0.0.1:9", 14).await
    }

    pub async fn request(&self, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(builder.body(body).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    /// Save a lookup whose snapshot covers 14 days from 2024-01-01; returns its id.
    pub async fn save(&self, location: &str, start: &str, end: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/history",
                Some(json!({
                    "locationQuery": location,
                    "startDate": start,
                    "endDate": end,
                    "weatherData": snapshot(location, "2024-01-01", 14),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["_id"].as_str().expect("_id").to_string()
    }
}

fn dates(first: &str, days: u32) -> impl Iterator<Item = (u32, String)> {
    let start = NaiveDate::parse_from_str(first, "%Y-%m-%d").expect("date");
    (0..days).map(move |i| {
        let date = start + Duration::days(i64::from(i));
        (i, date.format("%Y-%m-%d").to_string())
    })
}

/// A `forecast.json` body as the weather provider sends it.
pub fn provider_payload(name: &str, first: &str, days: u32) -> Value {
    let forecastday: Vec<Value> = dates(first, days)
        .map(|(i, date)| {
            json!({
                "date": date,
                "date_epoch": 1704067200 + i64::from(i) * 86400,
                "day": {
                    "maxtemp_c": 10.0 + f64::from(i),
                    "mintemp_c": 1.0 + f64::from(i),
                    "avghumidity": 80,
                    "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/113.png", "code": 1000 }
                },
                "astro": { "sunrise": "08:06 AM" },
                "hour": []
            })
        })
        .collect();

    json!({
        "location": {
            "name": name,
            "region": "City of London, Greater London",
            "country": "United Kingdom",
            "lat": 51.52,
            "lon": -0.11,
            "tz_id": "Europe/London"
        },
        "current": {
            "temp_c": 11.0,
            "temp_f": 51.8,
            "condition": { "text": "Clear", "icon": "//cdn.weatherapi.com/113.png", "code": 1000 },
            "humidity": 60,
            "wind_kph": 9.4,
            "feelslike_c": 10.1
        },
        "forecast": { "forecastday": forecastday }
    })
}

/// A reshaped report as the weather proxy returns it.
pub fn snapshot(name: &str, first: &str, days: u32) -> Value {
    let forecast: Vec<Value> = dates(first, days)
        .map(|(i, date)| {
            json!({
                "date": date,
                "max_temp_c": 10.0 + f64::from(i),
                "min_temp_c": 1.0 + f64::from(i),
                "condition": { "text": "Sunny", "icon": "//cdn.weatherapi.com/113.png", "code": 1000 }
            })
        })
        .collect();

    json!({
        "location": { "name": name, "country": "Somewhere", "lat": 1.5, "lon": -2.5 },
        "current": {
            "temp_c": 11.0,
            "condition": { "text": "Clear", "icon": "//cdn.weatherapi.com/113.png", "code": 1000 },
            "humidity": 60.0,
            "wind_kph": 9.4,
            "feelslike_c": 10.1
        },
        "forecast": forecast
    })
}
