//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! with an in-memory sheet gateway injected, enabling end-to-end testing
//! without Google Sheets.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use holds_core::{
    auth::ApiKeyAuthenticator,
    config::{ArtistsConfig, AuthConfig, GoogleConfig, ServerConfig},
    testing::MockSheetGateway,
    AuthMethod, Authenticator, Config, HoldsService, NoneAuthenticator,
};

/// Re-export fixtures for test convenience
pub use holds_core::testing::fixtures;

/// Test fixture for E2E testing with a mock gateway.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_log_holds() {
///     let fixture = TestFixture::new();
///
///     let response = fixture.post("/api/v1/holds/log", json!({
///         "artist": "weakened-friends",
///         "venue": "The Sinclair",
///         "dates": ["2026-04-30"]
///     })).await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock gateway - seed and inspect sheet rows
    pub gateway: Arc<MockSheetGateway>,
    /// Key required when the fixture uses api_key auth
    pub api_key: Option<String>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with no authentication.
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create a test fixture that requires the given API key.
    pub fn with_api_key(key: &str) -> Self {
        Self::build(Some(key.to_string()))
    }

    fn build(api_key: Option<String>) -> Self {
        let gateway = Arc::new(MockSheetGateway::new());

        let (auth, authenticator): (AuthConfig, Arc<dyn Authenticator>) = match &api_key {
            Some(key) => (
                AuthConfig {
                    method: AuthMethod::ApiKey,
                    api_key: Some(key.clone()),
                },
                Arc::new(ApiKeyAuthenticator::new(key.clone())),
            ),
            None => (
                AuthConfig {
                    method: AuthMethod::None,
                    api_key: None,
                },
                Arc::new(NoneAuthenticator),
            ),
        };

        let config = Config {
            auth,
            server: ServerConfig {
                host: std::net::IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
                port: 5000, // Not used for in-process testing
            },
            google: GoogleConfig::default(),
            artists: ArtistsConfig::default(),
        };

        let service = HoldsService::new(
            Arc::new(fixtures::directory()),
            Arc::clone(&gateway) as Arc<dyn holds_core::SheetGateway>,
        );

        let state = Arc::new(holds_server::state::AppState::new(
            config,
            authenticator,
            service,
        ));

        let router = holds_server::api::create_router(state);

        Self {
            router,
            gateway,
            api_key,
        }
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request("GET", path, None).await
    }

    /// Send a POST request with JSON body.
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        self.request("POST", path, Some(body)).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = self
            .builder("POST", path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request without any credentials.
    pub async fn get_unauthenticated(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request and return the raw body text.
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = self.builder("GET", path).body(Body::empty()).unwrap();
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    fn builder(&self, method: &str, path: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(path);
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("Bearer {}", key)),
            None => builder,
        }
    }

    /// Send a request to the test server.
    async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let mut request_builder = self.builder(method, path);

        let body = if let Some(json_body) = body {
            request_builder = request_builder.header("Content-Type", "application/json");
            Body::from(serde_json::to_vec(&json_body).unwrap())
        } else {
            Body::empty()
        };

        self.send(request_builder.body(body).unwrap()).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}

/// Helper to assert a JSON path equals expected value.
#[macro_export]
macro_rules! assert_json_path {
    ($json:expr, $path:expr, $expected:expr) => {
        let actual = &$json[$path];
        assert_eq!(
            actual, &$expected,
            "Path '{}' expected {:?}, got {:?}",
            $path, $expected, actual
        );
    };
}
