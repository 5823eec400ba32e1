use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::middleware::{auth_middleware, metrics_middleware};
use super::{handlers, holds, tools};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    // API routes
    let api_routes = Router::new()
        // Tools
        .route("/tools", get(tools::list_tools))
        .route("/tools/call", post(tools::call_tool))
        // Holds
        .route("/holds/log", post(holds::log_holds))
        .route("/holds/status", post(holds::update_holds_status))
        .route("/holds/{artist}", get(holds::read_holds_sheet))
        // Directory and config
        .route("/artists", get(handlers::list_artists))
        .route("/config", get(handlers::get_config))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        // Health stays reachable without credentials
        .route("/health", get(handlers::health))
        .with_state(state);

    Router::new()
        .route("/metrics", get(handlers::metrics))
        .nest("/api/v1", api_routes)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
