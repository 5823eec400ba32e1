//! Prometheus metrics for observability.
//!
//! This module provides metrics for monitoring the holds logger server:
//! - HTTP request metrics (latency, counts, errors)
//! - Authentication failures
//! - Tool calls by name and result
//!
//! Core metrics (holds written, Sheets API calls) are registered alongside.

use once_cell::sync::Lazy;
use prometheus::{
    self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};

/// Global metrics registry.
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

// =============================================================================
// HTTP Request Metrics
// =============================================================================

/// HTTP request duration in seconds.
pub static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "holds_http_request_duration_seconds",
            "HTTP request duration in seconds",
        )
        .buckets(vec![
            0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
        ]),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests total count.
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("holds_http_requests_total", "Total HTTP requests"),
        &["method", "path", "status"],
    )
    .unwrap()
});

/// HTTP requests currently in flight.
pub static HTTP_REQUESTS_IN_FLIGHT: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::new(
        "holds_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
    )
    .unwrap()
});

/// Authentication failures.
pub static AUTH_FAILURES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("holds_auth_failures_total", "Total authentication failures"),
        &["reason"],
    )
    .unwrap()
});

// =============================================================================
// Tool Metrics
// =============================================================================

/// Tool calls by tool name and result ("success" or an error kind).
pub static TOOL_CALLS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("holds_tool_calls_total", "Total tool calls"),
        &["tool", "result"],
    )
    .unwrap()
});

// =============================================================================
// Registration
// =============================================================================

fn register_metrics(registry: &Registry) {
    // HTTP
    registry
        .register(Box::new(HTTP_REQUEST_DURATION.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .unwrap();
    registry
        .register(Box::new(HTTP_REQUESTS_IN_FLIGHT.clone()))
        .unwrap();
    registry
        .register(Box::new(AUTH_FAILURES_TOTAL.clone()))
        .unwrap();

    // Tools
    registry
        .register(Box::new(TOOL_CALLS_TOTAL.clone()))
        .unwrap();

    // Core metrics (holds ledger, Sheets API)
    for metric in holds_core::metrics::all_metrics() {
        registry.register(metric).unwrap();
    }
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
    }
    String::from_utf8(buffer).unwrap_or_default()
}

/// Normalize a path for metric labels (replace artist keys with a placeholder).
pub fn normalize_path(path: &str) -> String {
    match path.strip_prefix("/api/v1/holds/") {
        Some(rest) if !rest.is_empty() && !matches!(rest, "log" | "status") => {
            "/api/v1/holds/{artist}".to_string()
        }
        _ => path.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_artist() {
        assert_eq!(
            normalize_path("/api/v1/holds/weakened-friends"),
            "/api/v1/holds/{artist}"
        );
    }

    #[test]
    fn test_normalize_path_static_routes() {
        assert_eq!(normalize_path("/api/v1/holds/log"), "/api/v1/holds/log");
        assert_eq!(normalize_path("/api/v1/holds/status"), "/api/v1/holds/status");
        assert_eq!(normalize_path("/api/v1/tools/call"), "/api/v1/tools/call");
        assert_eq!(normalize_path("/metrics"), "/metrics");
    }

    #[test]
    fn test_encode_metrics_includes_core_metrics() {
        holds_core::metrics::HOLDS_LOGGED.inc_by(0);
        TOOL_CALLS_TOTAL
            .with_label_values(&["log_holds", "success"])
            .inc();

        let output = encode_metrics();
        assert!(output.contains("holds_logged_total"));
        assert!(output.contains("holds_tool_calls_total"));
    }
}
