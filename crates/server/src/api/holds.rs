//! Direct holds endpoints.
//!
//! Same operations as the tool surface, addressed by path instead of by name.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use std::sync::Arc;
use holds_core::service::{
    HoldsSheet, LogHoldsRequest, LogHoldsResult, UpdateHoldsRequest, UpdateHoldsResult,
};

use super::error::ApiError;
use super::middleware::AuthUser;
use crate::state::AppState;

/// Record hold requests for a venue
pub async fn log_holds(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<LogHoldsRequest>, JsonRejection>,
) -> Result<Json<LogHoldsResult>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!("log_holds for {} requested by {}", request.artist, caller);

    let result = state
        .service()
        .log_holds(&request.artist, &request.venue, &request.dates)
        .await?;
    Ok(Json(result))
}

/// Confirm holds with their hold numbers
pub async fn update_holds_status(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<UpdateHoldsRequest>, JsonRejection>,
) -> Result<Json<UpdateHoldsResult>, ApiError> {
    let Json(request) = payload?;
    tracing::debug!(
        "update_holds_status for {} requested by {}",
        request.artist,
        caller
    );

    let result = state
        .service()
        .update_holds_status(&request.artist, &request.venue, &request.hold_data)
        .await?;
    Ok(Json(result))
}

/// Read an artist's holds sheet
pub async fn read_holds_sheet(
    State(state): State<Arc<AppState>>,
    Path(artist): Path<String>,
) -> Result<Json<HoldsSheet>, ApiError> {
    let sheet = state.service().read_holds_sheet(&artist).await?;
    Ok(Json(sheet))
}
