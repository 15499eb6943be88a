pub mod dto;
mod extractors;
pub mod handlers;
pub mod openapi;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::routes::create_router;
    use crate::api::state::AppState;
    use crate::config::{Config, DatabaseConfig, ServerConfig, WeatherConfig};
    use crate::weather::WeatherClient;

    async fn test_state(weather_base_url: String) -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                url: format!("file:{}", dir.path().join("api.db").display()),
                ..DatabaseConfig::default()
            },
            weather: WeatherConfig {
                api_key: "test-key".to_string(),
                base_url: weather_base_url,
                ..WeatherConfig::default()
            },
        };

        let raw_db = crate::db::Database::new(&config.database).await.unwrap();
        let db_backend = crate::db::LibSqlBackend::new(raw_db);
        let db: std::sync::Arc<dyn crate::db::DatabaseBackend> = std::sync::Arc::new(db_backend);
        let weather = WeatherClient::new(&config.weather).unwrap();

        (dir, AppState::new(db, weather))
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_banner_is_served() {
        let (_dir, state) = test_state("http://127.0.0.1:9".to_string()).await;
        let app = create_router(state);

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_database() {
        let (_dir, state) = test_state("http://127.0.0.1:9".to_string()).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["database"], "ok");
        assert_eq!(json["forecast_days"], 14);
    }

    #[tokio::test]
    async fn missing_location_is_rejected_before_upstream() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let (_dir, state) = test_state(mock_server.uri()).await;
        let app = create_router(state);

        for uri in ["/api/weather", "/api/weather?location="] {
            let response = app
                .clone()
                .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            let json = body_json(response).await;
            assert!(json["error"].as_str().unwrap().contains("Location"));
        }
    }

    #[tokio::test]
    async fn upstream_failure_returns_safe_summary() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast.json"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 2008, "message": "API key has been disabled." }
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let (_dir, state) = test_state(mock_server.uri()).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/weather?location=London")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(response).await;
        assert_eq!(
            json["error"],
            "An unexpected error occurred while fetching weather data."
        );
        assert!(!json.to_string().contains("disabled"));
    }

    #[tokio::test]
    async fn patch_without_notes_is_validation_error() {
        let (_dir, state) = test_state("http://127.0.0.1:9".to_string()).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("PATCH")
                    .uri("/api/history/V1StGXR8_Z5jdHi6B-myT")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"], "No 'notes' field provided for update.");
    }

    #[tokio::test]
    async fn malformed_json_body_is_validation_error() {
        let (_dir, state) = test_state("http://127.0.0.1:9".to_string()).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/history")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn openapi_json_is_valid() {
        let (_dir, state) = test_state("http://127.0.0.1:9".to_string()).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let version = json["openapi"]
            .as_str()
            .expect("openapi field should be a string");
        assert!(version.starts_with('3'), "got {version}");
        assert!(json["paths"].get("/api/history/{id}").is_some());
    }
}
