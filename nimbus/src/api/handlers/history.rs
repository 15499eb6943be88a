//! Saved-lookup handlers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::Query;

use crate::api::dto::{
    CreateLookupRequest, CreateLookupResponse, DeleteLookupResponse, ForecastSliceResponse,
    ListHistoryQuery, MessageResponse, UpdateNotesRequest,
};
use crate::api::extractors::AppJson;
use crate::api::AppState;
use crate::error::SummarizedError;
use crate::models::SavedLookup;

/// `POST /api/history`
#[utoipa::path(
    post,
    path = "/api/history",
    tag = "history",
    operation_id = "history.create",
    request_body = CreateLookupRequest,
    responses(
        (status = 201, description = "Lookup saved", body = CreateLookupResponse),
        (status = 400, description = "Missing required field"),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn create_lookup(
    State(state): State<AppState>,
    AppJson(req): AppJson<CreateLookupRequest>,
) -> Result<(StatusCode, Json<CreateLookupResponse>), SummarizedError> {
    let summary = "Failed to save weather data to history.";

    let new = req.into_new_lookup().map_err(|e| e.with_summary(summary))?;
    let lookup = state
        .history
        .create(new)
        .await
        .map_err(|e| e.with_summary(summary))?;

    Ok((StatusCode::CREATED, Json(CreateLookupResponse::from(lookup))))
}

/// `GET /api/history?location=`
#[utoipa::path(
    get,
    path = "/api/history",
    tag = "history",
    operation_id = "history.list",
    params(ListHistoryQuery),
    responses(
        (status = 200, description = "Saved lookups, newest first", body = [SavedLookup]),
        (status = 500, description = "Store failure"),
    )
)]
pub async fn list_lookups(
    State(state): State<AppState>,
    Query(query): Query<ListHistoryQuery>,
) -> Result<Json<Vec<SavedLookup>>, SummarizedError> {
    state
        .history
        .list(query.location.as_deref())
        .await
        .map(Json)
        .map_err(|e| e.with_summary("Failed to fetch weather history."))
}

/// `GET /api/history/{id}`
#[utoipa::path(
    get,
    path = "/api/history/{id}",
    tag = "history",
    operation_id = "history.get",
    params(("id" = String, Path, description = "Lookup ID")),
    responses(
        (status = 200, description = "Saved lookup", body = SavedLookup),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "No such lookup"),
    )
)]
pub async fn get_lookup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SavedLookup>, SummarizedError> {
    state
        .history
        .get(&id)
        .await
        .map(Json)
        .map_err(|e| e.with_summary("Failed to fetch weather history item."))
}

/// `GET /api/history/{id}/forecast`
///
/// The snapshot's forecast restricted to the record's saved date range.
#[utoipa::path(
    get,
    path = "/api/history/{id}/forecast",
    tag = "history",
    operation_id = "history.forecast",
    params(("id" = String, Path, description = "Lookup ID")),
    responses(
        (status = 200, description = "Forecast days within the saved range", body = ForecastSliceResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "No such lookup, or no forecast data for the range"),
    )
)]
pub async fn get_forecast_slice(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ForecastSliceResponse>, SummarizedError> {
    let slice = state
        .history
        .forecast_slice(&id)
        .await
        .map_err(|e| e.with_summary("Failed to load forecast for weather history item."))?;

    Ok(Json(ForecastSliceResponse {
        id: slice.lookup.id.to_string(),
        location: slice.location,
        start_date: slice.lookup.start_date,
        end_date: slice.lookup.end_date,
        average_high_c: slice.average_high_c,
        forecast: slice.forecast,
    }))
}

/// `PATCH /api/history/{id}`
#[utoipa::path(
    patch,
    path = "/api/history/{id}",
    tag = "history",
    operation_id = "history.updateNotes",
    params(("id" = String, Path, description = "Lookup ID")),
    request_body = UpdateNotesRequest,
    responses(
        (status = 200, description = "Notes updated", body = MessageResponse),
        (status = 400, description = "Missing notes or malformed ID"),
        (status = 404, description = "No such lookup"),
    )
)]
pub async fn update_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    AppJson(req): AppJson<UpdateNotesRequest>,
) -> Result<Json<MessageResponse>, SummarizedError> {
    state
        .history
        .update_notes(&id, req.notes)
        .await
        .map_err(|e| e.with_summary("Failed to update weather history item."))?;

    Ok(Json(MessageResponse {
        message: "History item updated successfully.".to_string(),
    }))
}

/// `DELETE /api/history/{id}`
#[utoipa::path(
    delete,
    path = "/api/history/{id}",
    tag = "history",
    operation_id = "history.delete",
    params(("id" = String, Path, description = "Lookup ID")),
    responses(
        (status = 200, description = "Lookup deleted", body = DeleteLookupResponse),
        (status = 400, description = "Malformed ID"),
        (status = 404, description = "No such lookup"),
    )
)]
pub async fn delete_lookup(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteLookupResponse>, SummarizedError> {
    let id = state
        .history
        .delete(&id)
        .await
        .map_err(|e| e.with_summary("Failed to delete weather history item."))?;

    Ok(Json(DeleteLookupResponse {
        message: "History item deleted successfully.".to_string(),
        id: id.to_string(),
    }))
}
