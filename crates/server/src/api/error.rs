//! JSON error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use holds_core::HoldsError;
use serde::Serialize;
use tracing::{debug, error};

/// Error body returned by every API endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// An error ready to be turned into an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub kind: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, kind: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            kind,
            message: message.into(),
        }
    }

    pub fn unknown_tool(name: &str) -> Self {
        Self::new(
            StatusCode::NOT_FOUND,
            "unknown_tool",
            format!("Unknown tool: {}", name),
        )
    }

    pub fn invalid_arguments(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_arguments", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
    }
}

impl From<HoldsError> for ApiError {
    fn from(err: HoldsError) -> Self {
        let status = match &err {
            HoldsError::UnknownArtist(_) => StatusCode::NOT_FOUND,
            HoldsError::Validation { .. } => StatusCode::BAD_REQUEST,
            HoldsError::Gateway(_) => StatusCode::BAD_GATEWAY,
        };
        Self::new(status, err.kind(), err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(
            StatusCode::BAD_REQUEST,
            "invalid_request",
            rejection.body_text(),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!("{} ({}): {}", self.kind, self.status, self.message);
        } else {
            debug!("{} ({}): {}", self.kind, self.status, self.message);
        }

        (
            self.status,
            Json(ErrorResponse {
                error: self.kind.to_string(),
                message: self.message,
            }),
        )
            .into_response()
    }
}
