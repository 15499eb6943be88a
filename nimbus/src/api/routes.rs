use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use super::handlers;
use super::openapi;
use super::AppState;

/// Saved snapshots are a few kilobytes; anything near this is not a lookup.
const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let history = Router::new()
        .route(
            "/",
            post(handlers::history::create_lookup).get(handlers::history::list_lookups),
        )
        .route(
            "/{id}",
            get(handlers::history::get_lookup)
                .patch(handlers::history::update_notes)
                .delete(handlers::history::delete_lookup),
        )
        .route("/{id}/forecast", get(handlers::history::get_forecast_slice));

    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/weather", get(handlers::weather::get_weather))
        .route("/openapi.json", get(openapi::openapi_json))
        .merge(openapi::redoc_router())
        .nest("/history", history);

    Router::new()
        .route("/", get(handlers::root))
        .nest("/api", api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
