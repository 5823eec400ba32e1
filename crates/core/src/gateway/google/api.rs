//! Wire types for the Sheets v4 REST API.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::CellValue;

/// `spreadsheets.values.get` response.
#[derive(Debug, Deserialize)]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// `spreadsheets.values.append` response.
#[derive(Debug, Deserialize)]
pub struct AppendResponse {
    pub updates: AppendUpdates,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendUpdates {
    pub updated_range: String,
    #[serde(default)]
    pub updated_rows: Option<u32>,
}

/// Body of `spreadsheets.values.append`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendBody {
    pub major_dimension: &'static str,
    pub values: Vec<Vec<CellValue>>,
}

/// Body of `spreadsheets.values.batchUpdate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchValuesBody {
    pub value_input_option: &'static str,
    pub data: Vec<RangeValues>,
}

#[derive(Debug, Serialize)]
pub struct RangeValues {
    pub range: String,
    pub values: Vec<Vec<CellValue>>,
}

/// `spreadsheets.get` response restricted to sheet properties.
#[derive(Debug, Deserialize)]
pub struct SpreadsheetMeta {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetProperties {
    pub sheet_id: i64,
    pub title: String,
}

/// Error envelope returned by Google APIs.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}
