//! End-to-end tests with a mocked sheet gateway.
//!
//! These tests run the full router in-process: auth, tool dispatch, direct
//! holds endpoints and error mapping.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use holds_core::{GatewayError, HoldStatus};

use common::{fixtures, TestFixture};

// =============================================================================
// Basic API Tests
// =============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/health").await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "status", "ok");
    assert_json_path!(response.body, "service", "holds-logger");
    assert_json_path!(
        response.body,
        "artists",
        json!(["ballroom-thieves", "weakened-friends"])
    );
}

#[tokio::test]
async fn test_list_artists() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/artists").await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "count", 2);
}

#[tokio::test]
async fn test_config_is_sanitized() {
    let fixture = TestFixture::with_api_key("secret-key");
    let response = fixture.get("/api/v1/config").await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body["auth"], "method", "api_key");
    assert!(response.body["auth"].get("api_key").is_none());
    assert_json_path!(response.body["google"], "credentials_configured", false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let fixture = TestFixture::new();
    fixture.get("/api/v1/health").await;

    let (status, text) = fixture.get_text("/metrics").await;
    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("holds_http_requests_total"));
}

// =============================================================================
// Auth Tests
// =============================================================================

#[tokio::test]
async fn test_api_key_required_for_tools() {
    let fixture = TestFixture::with_api_key("secret-key");

    let response = fixture.get_unauthenticated("/api/v1/tools").await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let response = fixture.get("/api/v1/tools").await;
    assert_status!(response, StatusCode::OK);
}

#[tokio::test]
async fn test_health_does_not_require_api_key() {
    let fixture = TestFixture::with_api_key("secret-key");
    let response = fixture.get_unauthenticated("/api/v1/health").await;
    assert_status!(response, StatusCode::OK);
}

// =============================================================================
// Tool Surface Tests
// =============================================================================

#[tokio::test]
async fn test_list_tools() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/tools").await;

    assert_status!(response, StatusCode::OK);
    let names: Vec<&str> = response.body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["log_holds", "update_holds_status", "read_holds_sheet"]
    );
    assert_eq!(response.body["tools"][0]["parameters"]["type"], "object");
}

#[tokio::test]
async fn test_tool_log_then_update() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/tools/call",
            json!({
                "name": "log_holds",
                "arguments": {
                    "artist": "weakened-friends",
                    "venue": "The Sinclair",
                    "dates": ["2026-04-30", "2026-05-01"]
                }
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert!(response.body["call_id"].is_string());
    assert_json_path!(response.body, "name", "log_holds");
    assert_eq!(
        response.body["result"]["logged"],
        json!([
            {"date": "2026-04-30", "priority_rank": 1, "priority": "first"},
            {"date": "2026-05-01", "priority_rank": 2, "priority": "second"}
        ])
    );

    let response = fixture
        .post(
            "/api/v1/tools/call",
            json!({
                "name": "update_holds_status",
                "arguments": {
                    "artist": "weakened-friends",
                    "venue": "The Sinclair",
                    "hold_data": {"2026-04-30": 3}
                }
            }),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body["result"], "applied", 1);
    assert_eq!(
        response.body["result"]["updates"][0],
        json!({"date": "2026-04-30", "outcome": "applied", "hold_number": 3})
    );

    let rows = fixture
        .gateway
        .rows(fixtures::WF_SHEET, fixtures::WF_TAB)
        .await;
    assert_eq!(rows[0].hold.status, HoldStatus::HoldConfirmed);
    assert_eq!(rows[0].hold.hold_number, Some(3));
    assert_eq!(rows[1].hold.status, HoldStatus::AskedHold);
}

#[tokio::test]
async fn test_tool_read_holds_sheet() {
    let fixture = TestFixture::new();
    fixture
        .gateway
        .seed(
            fixtures::TBT_SHEET,
            fixtures::TBT_TAB,
            vec![fixtures::hold("Brooklyn Bowl", "2026-05-02", 1)],
        )
        .await;

    let response = fixture
        .post(
            "/api/v1/tools/call",
            json!({"name": "read_holds_sheet", "arguments": {"artist": "ballroom-thieves"}}),
        )
        .await;

    assert_status!(response, StatusCode::OK);
    let rows = response.body["result"]["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["venue"], "Brooklyn Bowl");
    assert_eq!(rows[0]["row_ref"], 2);
}

#[tokio::test]
async fn test_unknown_tool() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/tools/call",
            json!({"name": "book_flight", "arguments": {}}),
        )
        .await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "error", "unknown_tool");
}

#[tokio::test]
async fn test_malformed_tool_arguments() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/tools/call",
            json!({"name": "log_holds", "arguments": {"artist": "weakened-friends"}}),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "error", "invalid_arguments");
    assert_eq!(fixture.gateway.calls().await.total(), 0);
}

#[tokio::test]
async fn test_malformed_request_body() {
    let fixture = TestFixture::new();
    let response = fixture.post_raw("/api/v1/tools/call", "{not json").await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "error", "invalid_request");
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_unknown_artist_is_not_found() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/tools/call",
            json!({
                "name": "log_holds",
                "arguments": {
                    "artist": "unknown-band",
                    "venue": "The Sinclair",
                    "dates": ["2026-04-30"]
                }
            }),
        )
        .await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "error", "unknown_artist");
    assert_eq!(fixture.gateway.calls().await.total(), 0);
}

#[tokio::test]
async fn test_invalid_date_is_bad_request() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/holds/log",
            json!({
                "artist": "weakened-friends",
                "venue": "The Sinclair",
                "dates": ["04/30/2026"]
            }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "error", "validation_error");
    let message = response.body["message"].as_str().unwrap();
    assert!(message.contains("dates"));
    assert!(message.contains("YYYY-MM-DD"));
}

#[tokio::test]
async fn test_negative_hold_number_is_bad_request() {
    let fixture = TestFixture::new();
    let response = fixture
        .post(
            "/api/v1/holds/status",
            json!({
                "artist": "weakened-friends",
                "venue": "The Sinclair",
                "hold_data": {"2026-04-30": -2}
            }),
        )
        .await;

    assert_status!(response, StatusCode::BAD_REQUEST);
    assert_json_path!(response.body, "error", "validation_error");
}

#[tokio::test]
async fn test_gateway_failure_is_bad_gateway() {
    let fixture = TestFixture::new();
    fixture
        .gateway
        .set_next_error(GatewayError::Auth("token expired".to_string()))
        .await;

    let response = fixture.get("/api/v1/holds/weakened-friends").await;

    assert_status!(response, StatusCode::BAD_GATEWAY);
    assert_json_path!(response.body, "error", "gateway_error");
}

// =============================================================================
// Direct Holds Endpoint Tests
// =============================================================================

#[tokio::test]
async fn test_direct_endpoints_round_trip() {
    let fixture = TestFixture::new();

    let response = fixture
        .post(
            "/api/v1/holds/log",
            json!({
                "artist": "weakened-friends",
                "venue": "The Sinclair",
                "dates": ["2026-04-30", "2026-04-30", "2026-05-01"]
            }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_eq!(response.body["logged"].as_array().unwrap().len(), 2);
    assert_json_path!(response.body, "skipped", json!(["2026-04-30"]));

    let response = fixture
        .post(
            "/api/v1/holds/status",
            json!({
                "artist": "weakened-friends",
                "venue": "The Sinclair",
                "hold_data": {"2026-05-01": 1, "2026-07-04": 2}
            }),
        )
        .await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "applied", 1);
    assert_json_path!(response.body, "total", 2);
    assert_eq!(response.body["updates"][1]["outcome"], "not_found");

    let response = fixture.get("/api/v1/holds/weakened-friends").await;
    assert_status!(response, StatusCode::OK);
    assert_json_path!(response.body, "artist", "weakened-friends");
    let rows = response.body["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1]["status"], "hold_confirmed");
    assert_eq!(rows[1]["hold_number"], 1);
}

#[tokio::test]
async fn test_read_unknown_artist() {
    let fixture = TestFixture::new();
    let response = fixture.get("/api/v1/holds/nobody").await;

    assert_status!(response, StatusCode::NOT_FOUND);
    assert_json_path!(response.body, "error", "unknown_artist");
}
