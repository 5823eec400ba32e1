//! Boundary over the spreadsheet store.
//!
//! The service only needs four calls: read the rows of a tab, append rows,
//! overwrite individual cells, and colour a row. [`GoogleSheetsGateway`]
//! implements them against the Google Sheets v4 API; tests use
//! `testing::MockSheetGateway`.

mod google;
pub mod layout;

pub use google::{
    GoogleSheetsGateway, ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource,
    SHEETS_SCOPE,
};
pub use layout::{CellUpdate, CellValue, HoldField};

use async_trait::async_trait;
use thiserror::Error;

use crate::ledger::{HoldRow, PriorityTag, RowRef, SheetRow};

/// Errors that can occur when talking to the spreadsheet store.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error.
    #[error("Sheets API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Could not obtain an access token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// No tab with the given name in the spreadsheet.
    #[error("Tab not found: {0}")]
    SheetNotFound(String),

    /// Gateway not configured (missing credentials).
    #[error("Sheet gateway not configured: {0}")]
    NotConfigured(String),
}

/// Trait for spreadsheet stores.
#[async_trait]
pub trait SheetGateway: Send + Sync {
    /// Name of the backend, for logs.
    fn name(&self) -> &str;

    /// Read every hold row in the tab, in sheet order.
    async fn fetch_rows(&self, sheet_id: &str, tab_name: &str)
        -> Result<Vec<SheetRow>, GatewayError>;

    /// Append rows after the last row in the tab, preserving order.
    /// Returns where each row landed.
    async fn append_rows(
        &self,
        sheet_id: &str,
        tab_name: &str,
        rows: &[HoldRow],
    ) -> Result<Vec<RowRef>, GatewayError>;

    /// Overwrite individual cells.
    async fn mutate_cells(
        &self,
        sheet_id: &str,
        tab_name: &str,
        updates: &[CellUpdate],
    ) -> Result<(), GatewayError>;

    /// Colour a row for its priority. Cosmetic; callers treat failure as non-fatal.
    async fn apply_style(
        &self,
        sheet_id: &str,
        tab_name: &str,
        row_ref: RowRef,
        tag: PriorityTag,
    ) -> Result<(), GatewayError>;
}

/// Stand-in used when no credentials are configured; every call fails.
#[derive(Debug, Default)]
pub struct UnconfiguredGateway;

impl UnconfiguredGateway {
    fn error() -> GatewayError {
        GatewayError::NotConfigured(
            "no Google service-account credentials were provided".to_string(),
        )
    }
}

#[async_trait]
impl SheetGateway for UnconfiguredGateway {
    fn name(&self) -> &str {
        "unconfigured"
    }

    async fn fetch_rows(&self, _: &str, _: &str) -> Result<Vec<SheetRow>, GatewayError> {
        Err(Self::error())
    }

    async fn append_rows(&self, _: &str, _: &str, _: &[HoldRow]) -> Result<Vec<RowRef>, GatewayError> {
        Err(Self::error())
    }

    async fn mutate_cells(&self, _: &str, _: &str, _: &[CellUpdate]) -> Result<(), GatewayError> {
        Err(Self::error())
    }

    async fn apply_style(&self, _: &str, _: &str, _: RowRef, _: PriorityTag) -> Result<(), GatewayError> {
        Err(Self::error())
    }
}
