//! Prometheus metrics for core components.
//!
//! This module provides metrics for:
//! - Holds ledger outcomes (logged, skipped, updated)
//! - Sheets API calls

use once_cell::sync::Lazy;
use prometheus::{HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts};

// =============================================================================
// Holds Metrics
// =============================================================================

/// New hold rows written.
pub static HOLDS_LOGGED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new("holds_logged_total", "Total hold requests written as new rows").unwrap()
});

/// Hold requests that were already present and left untouched.
pub static HOLDS_SKIPPED: Lazy<IntCounter> = Lazy::new(|| {
    IntCounter::new(
        "holds_skipped_total",
        "Total hold requests skipped because the venue/date was already logged",
    )
    .unwrap()
});

/// Status updates by outcome.
pub static HOLD_UPDATES: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("hold_updates_total", "Total hold status updates"),
        &["outcome"], // "applied", "not_found"
    )
    .unwrap()
});

// =============================================================================
// Sheets API Metrics
// =============================================================================

/// Sheets API request duration.
pub static SHEETS_API_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    HistogramVec::new(
        HistogramOpts::new(
            "sheets_api_duration_seconds",
            "Duration of spreadsheet API calls",
        )
        .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
        &["operation"],
    )
    .unwrap()
});

/// Sheets API requests total.
pub static SHEETS_API_REQUESTS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "sheets_api_requests_total",
            "Total spreadsheet API requests",
        ),
        &["operation", "result"], // result: "success", "error"
    )
    .unwrap()
});

// =============================================================================
// Helper functions
// =============================================================================

/// Get all core metrics for registration in a registry.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![
        Box::new(HOLDS_LOGGED.clone()),
        Box::new(HOLDS_SKIPPED.clone()),
        Box::new(HOLD_UPDATES.clone()),
        Box::new(SHEETS_API_DURATION.clone()),
        Box::new(SHEETS_API_REQUESTS.clone()),
    ]
}

/// Record one Sheets API call.
pub fn record_sheets_call(operation: &str, duration_secs: f64, success: bool) {
    SHEETS_API_DURATION
        .with_label_values(&[operation])
        .observe(duration_secs);
    SHEETS_API_REQUESTS
        .with_label_values(&[operation, if success { "success" } else { "error" }])
        .inc();
}
