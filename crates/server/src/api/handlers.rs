use axum::{extract::State, http::header, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use holds_core::SanitizedConfig;

use crate::metrics::encode_metrics;
use crate::state::AppState;

/// Name reported by the health endpoint.
const SERVICE_NAME: &str = "holds-logger";

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub artists: Vec<String>,
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        artists: state.service().directory().artist_keys(),
    })
}

pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}

#[derive(Serialize)]
pub struct ArtistsResponse {
    pub artists: Vec<String>,
    pub count: usize,
}

pub async fn list_artists(State(state): State<Arc<AppState>>) -> Json<ArtistsResponse> {
    let artists = state.service().directory().artist_keys();
    Json(ArtistsResponse {
        count: artists.len(),
        artists,
    })
}

/// Prometheus text exposition.
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        encode_metrics(),
    )
}
