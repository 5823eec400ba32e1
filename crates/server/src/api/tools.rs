//! Tool-calling surface.
//!
//! An agent runtime lists the tools once, then invokes them by name with a
//! JSON argument object. Each call is answered with the operation's result or
//! a JSON error body.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use holds_core::service::{LogHoldsRequest, ReadHoldsRequest, UpdateHoldsRequest};

use super::error::ApiError;
use super::middleware::AuthUser;
use crate::metrics::TOOL_CALLS_TOTAL;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// A tool as advertised to the calling runtime.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// JSON schema of the argument object.
    pub parameters: Value,
}

#[derive(Debug, Serialize)]
pub struct ToolsResponse {
    pub tools: Vec<ToolDescriptor>,
}

/// Request body for invoking a tool
#[derive(Debug, Deserialize)]
pub struct ToolCallRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

#[derive(Debug, Serialize)]
pub struct ToolCallResponse {
    pub call_id: String,
    pub name: String,
    pub result: Value,
}

// ============================================================================
// Manifest
// ============================================================================

pub const LOG_HOLDS: &str = "log_holds";
pub const UPDATE_HOLDS_STATUS: &str = "update_holds_status";
pub const READ_HOLDS_SHEET: &str = "read_holds_sheet";

/// Descriptors for every tool this service handles.
pub fn tool_descriptors() -> Vec<ToolDescriptor> {
    vec![
        ToolDescriptor {
            name: LOG_HOLDS,
            description: "Log hold requests for an artist at a venue. Dates already \
                          logged for the venue are skipped; new dates are ranked in the \
                          order given.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "artist": {
                        "type": "string",
                        "description": "Artist key, e.g. weakened-friends"
                    },
                    "venue": { "type": "string", "description": "Venue name" },
                    "dates": {
                        "type": "array",
                        "items": { "type": "string", "format": "date" },
                        "minItems": 1,
                        "description": "Requested dates as YYYY-MM-DD"
                    }
                },
                "required": ["artist", "venue", "dates"]
            }),
        },
        ToolDescriptor {
            name: UPDATE_HOLDS_STATUS,
            description: "Record hold numbers confirmed by a venue. Each date must \
                          already be logged; dates that are not are reported as \
                          not_found.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "artist": {
                        "type": "string",
                        "description": "Artist key, e.g. weakened-friends"
                    },
                    "venue": { "type": "string", "description": "Venue name" },
                    "hold_data": {
                        "type": "object",
                        "additionalProperties": { "type": "integer", "minimum": 0 },
                        "description": "Map of YYYY-MM-DD date to hold number"
                    }
                },
                "required": ["artist", "venue", "hold_data"]
            }),
        },
        ToolDescriptor {
            name: READ_HOLDS_SHEET,
            description: "Read every hold row in an artist's holds sheet.",
            parameters: json!({
                "type": "object",
                "properties": {
                    "artist": {
                        "type": "string",
                        "description": "Artist key, e.g. weakened-friends"
                    }
                },
                "required": ["artist"]
            }),
        },
    ]
}

// ============================================================================
// Handlers
// ============================================================================

/// List available tools
pub async fn list_tools() -> Json<ToolsResponse> {
    Json(ToolsResponse {
        tools: tool_descriptors(),
    })
}

/// Invoke a tool by name
pub async fn call_tool(
    State(state): State<Arc<AppState>>,
    AuthUser(caller): AuthUser,
    payload: Result<Json<ToolCallRequest>, JsonRejection>,
) -> Result<Json<ToolCallResponse>, ApiError> {
    let Json(request) = payload?;
    let call_id = Uuid::new_v4().to_string();

    info!("Tool call {} ({}) from {}", request.name, call_id, caller);

    let outcome = dispatch(&state, &request.name, request.arguments).await;

    let result_label = match &outcome {
        Ok(_) => "success",
        Err(e) => e.kind,
    };
    // Unknown names share one label value
    let tool_label = match request.name.as_str() {
        LOG_HOLDS | UPDATE_HOLDS_STATUS | READ_HOLDS_SHEET => request.name.as_str(),
        _ => "unknown",
    };
    TOOL_CALLS_TOTAL
        .with_label_values(&[tool_label, result_label])
        .inc();

    Ok(Json(ToolCallResponse {
        call_id,
        name: request.name,
        result: outcome?,
    }))
}

async fn dispatch(state: &AppState, name: &str, arguments: Value) -> Result<Value, ApiError> {
    let service = state.service();

    match name {
        LOG_HOLDS => {
            let args: LogHoldsRequest = parse_arguments(name, arguments)?;
            let result = service
                .log_holds(&args.artist, &args.venue, &args.dates)
                .await?;
            to_result(&result)
        }
        UPDATE_HOLDS_STATUS => {
            let args: UpdateHoldsRequest = parse_arguments(name, arguments)?;
            let result = service
                .update_holds_status(&args.artist, &args.venue, &args.hold_data)
                .await?;
            to_result(&result)
        }
        READ_HOLDS_SHEET => {
            let args: ReadHoldsRequest = parse_arguments(name, arguments)?;
            let result = service.read_holds_sheet(&args.artist).await?;
            to_result(&result)
        }
        other => Err(ApiError::unknown_tool(other)),
    }
}

fn parse_arguments<T: DeserializeOwned>(name: &str, arguments: Value) -> Result<T, ApiError> {
    serde_json::from_value(arguments)
        .map_err(|e| ApiError::invalid_arguments(format!("Invalid arguments for {}: {}", name, e)))
}

fn to_result<T: Serialize>(result: &T) -> Result<Value, ApiError> {
    serde_json::to_value(result)
        .map_err(|e| ApiError::internal(format!("Failed to serialize result: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors_cover_dispatch() {
        let names: Vec<&str> = tool_descriptors().iter().map(|t| t.name).collect();
        assert_eq!(names, vec![LOG_HOLDS, UPDATE_HOLDS_STATUS, READ_HOLDS_SHEET]);
    }

    #[test]
    fn test_descriptors_declare_required_arguments() {
        for tool in tool_descriptors() {
            let required = tool.parameters["required"]
                .as_array()
                .expect("required must be an array");
            assert!(
                required.iter().any(|r| r == "artist"),
                "{} must require artist",
                tool.name
            );
        }
    }

    #[test]
    fn test_parse_arguments_reports_tool_name() {
        let result: Result<LogHoldsRequest, _> =
            parse_arguments(LOG_HOLDS, json!({"artist": "weakened-friends"}));
        let err = result.unwrap_err();
        assert_eq!(err.kind, "invalid_arguments");
        assert!(err.message.contains(LOG_HOLDS));
    }
}
