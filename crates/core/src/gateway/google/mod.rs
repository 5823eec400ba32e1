//! Google Sheets v4 implementation of the sheet gateway.

mod api;
mod token;

pub use token::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource, SHEETS_SCOPE};

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use self::api::{
    AppendBody, AppendResponse, BatchValuesBody, ErrorEnvelope, RangeValues, SpreadsheetMeta,
    ValueRange,
};
use super::layout::{self, ParsedRow};
use super::{CellUpdate, GatewayError, SheetGateway};
use crate::config::{ConfigError, GoogleConfig};
use crate::ledger::{HoldRow, PriorityTag, RowRef, SheetRow};
use crate::metrics;

/// Google Sheets API client.
pub struct GoogleSheetsGateway {
    client: Client,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
    /// Numeric tab ids keyed by (sheet_id, tab_name).
    tab_ids: RwLock<HashMap<(String, String), i64>>,
}

impl GoogleSheetsGateway {
    /// Build from configuration. Requires `google.credentials`.
    pub fn new(config: &GoogleConfig) -> Result<Self, ConfigError> {
        let credentials = config
            .credentials
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                ConfigError::ValidationError("google.credentials is not set".to_string())
            })?;

        let client = build_client(Duration::from_secs(config.timeout_secs as u64))
            .map_err(|e| ConfigError::ValidationError(format!("HTTP client: {}", e)))?;

        let key = ServiceAccountKey::from_json(credentials)?;
        let tokens = ServiceAccountTokenSource::new(key, client.clone())?;

        Ok(Self {
            client,
            base_url: config.sheets_base_url.trim_end_matches('/').to_string(),
            tokens: Arc::new(tokens),
            tab_ids: RwLock::default(),
        })
    }

    /// Build with an explicit token source (tests, pre-minted tokens).
    pub fn with_token_source(
        base_url: impl Into<String>,
        timeout: Duration,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            client: build_client(timeout)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tokens,
            tab_ids: RwLock::default(),
        })
    }

    fn spreadsheet_url(&self, sheet_id: &str) -> String {
        format!(
            "{}/spreadsheets/{}",
            self.base_url,
            urlencoding::encode(sheet_id)
        )
    }

    fn values_url(&self, sheet_id: &str, range: &str) -> String {
        format!(
            "{}/values/{}",
            self.spreadsheet_url(sheet_id),
            urlencoding::encode(range)
        )
    }

    /// Send an authorized request and decode the JSON response.
    async fn send<T: DeserializeOwned>(
        &self,
        operation: &str,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let started = Instant::now();
        let result = self.send_inner(request).await;
        metrics::record_sheets_call(operation, started.elapsed().as_secs_f64(), result.is_ok());
        result
    }

    async fn send_inner<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, GatewayError> {
        let token = self.tokens.access_token().await?;
        let response = request.bearer_auth(token).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);

            return Err(match status.as_u16() {
                401 | 403 => GatewayError::Auth(message),
                404 => GatewayError::SheetNotFound(message),
                code => GatewayError::Api {
                    status: code,
                    message,
                },
            });
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(e.to_string()))
    }

    /// Numeric id of a tab, needed by formatting requests. Looked up once per
    /// tab; a failed formatting request evicts the entry.
    async fn tab_id(&self, sheet_id: &str, tab_name: &str) -> Result<i64, GatewayError> {
        let key = (sheet_id.to_string(), tab_name.to_string());
        if let Some(id) = self.tab_ids.read().await.get(&key) {
            return Ok(*id);
        }

        let request = self
            .client
            .get(self.spreadsheet_url(sheet_id))
            .query(&[("fields", "sheets.properties(sheetId,title)")]);

        let meta: SpreadsheetMeta = self.send("get_spreadsheet", request).await?;

        let id = meta
            .sheets
            .into_iter()
            .find(|s| s.properties.title == tab_name)
            .map(|s| s.properties.sheet_id)
            .ok_or_else(|| GatewayError::SheetNotFound(tab_name.to_string()))?;

        self.tab_ids.write().await.insert(key, id);
        Ok(id)
    }
}

fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("holds-logger/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Background colour (RGB, 0..1) for a priority tag.
fn tag_color(tag: PriorityTag) -> (f32, f32, f32) {
    match tag {
        PriorityTag::First => (0.72, 0.88, 0.80),
        PriorityTag::Second => (1.0, 0.95, 0.70),
        PriorityTag::Third => (0.99, 0.80, 0.60),
        PriorityTag::FourthPlus => (0.96, 0.70, 0.70),
    }
}

#[async_trait]
impl SheetGateway for GoogleSheetsGateway {
    fn name(&self) -> &str {
        "google_sheets"
    }

    async fn fetch_rows(
        &self,
        sheet_id: &str,
        tab_name: &str,
    ) -> Result<Vec<SheetRow>, GatewayError> {
        let range = layout::data_range(tab_name);
        debug!("Fetching {} from {}", range, sheet_id);

        let request = self.client.get(self.values_url(sheet_id, &range));
        let values: ValueRange = self.send("fetch_rows", request).await?;

        let first_row = values
            .range
            .as_deref()
            .and_then(layout::range_start_row)
            .unwrap_or(1);

        let mut rows = Vec::new();
        for (offset, cells) in values.values.iter().enumerate() {
            let row_ref = RowRef(first_row + offset as u32);
            match layout::parse_row(row_ref, cells) {
                ParsedRow::Hold(row) => rows.push(row),
                ParsedRow::Blank => {}
                // Row 1 is the header
                ParsedRow::Unrecognized(_) if row_ref.0 == 1 => {}
                ParsedRow::Unrecognized(reason) => {
                    warn!("Skipping row {} of '{}': {}", row_ref, tab_name, reason);
                }
            }
        }

        Ok(rows)
    }

    async fn append_rows(
        &self,
        sheet_id: &str,
        tab_name: &str,
        rows: &[HoldRow],
    ) -> Result<Vec<RowRef>, GatewayError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let range = layout::data_range(tab_name);
        let body = AppendBody {
            major_dimension: "ROWS",
            values: rows.iter().map(layout::encode_row).collect(),
        };

        let request = self
            .client
            .post(format!("{}:append", self.values_url(sheet_id, &range)))
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body);

        let response: AppendResponse = self.send("append_rows", request).await?;

        let start = layout::range_start_row(&response.updates.updated_range).ok_or_else(|| {
            GatewayError::Parse(format!(
                "unexpected updatedRange '{}'",
                response.updates.updated_range
            ))
        })?;

        if let Some(updated) = response.updates.updated_rows {
            if updated as usize != rows.len() {
                warn!(
                    "Appended {} row(s) to '{}' but the API reports {}",
                    rows.len(),
                    tab_name,
                    updated
                );
            }
        }

        Ok((0..rows.len() as u32).map(|i| RowRef(start + i)).collect())
    }

    async fn mutate_cells(
        &self,
        sheet_id: &str,
        tab_name: &str,
        updates: &[CellUpdate],
    ) -> Result<(), GatewayError> {
        if updates.is_empty() {
            return Ok(());
        }

        let body = BatchValuesBody {
            value_input_option: "RAW",
            data: updates
                .iter()
                .map(|u| RangeValues {
                    range: u.a1(tab_name),
                    values: vec![vec![u.value.clone()]],
                })
                .collect(),
        };

        let request = self
            .client
            .post(format!("{}/values:batchUpdate", self.spreadsheet_url(sheet_id)))
            .json(&body);

        let _: serde_json::Value = self.send("mutate_cells", request).await?;
        Ok(())
    }

    async fn apply_style(
        &self,
        sheet_id: &str,
        tab_name: &str,
        row_ref: RowRef,
        tag: PriorityTag,
    ) -> Result<(), GatewayError> {
        let tab_id = self.tab_id(sheet_id, tab_name).await?;
        let (red, green, blue) = tag_color(tag);

        let body = json!({
            "requests": [{
                "repeatCell": {
                    "range": {
                        "sheetId": tab_id,
                        "startRowIndex": row_ref.0 - 1,
                        "endRowIndex": row_ref.0,
                        "startColumnIndex": 0,
                        "endColumnIndex": layout::HEADERS.len(),
                    },
                    "cell": {
                        "userEnteredFormat": {
                            "backgroundColor": { "red": red, "green": green, "blue": blue }
                        }
                    },
                    "fields": "userEnteredFormat.backgroundColor",
                }
            }]
        });

        let request = self
            .client
            .post(format!("{}:batchUpdate", self.spreadsheet_url(sheet_id)))
            .json(&body);

        let result: Result<serde_json::Value, _> = self.send("apply_style", request).await;
        if result.is_err() {
            self.tab_ids
                .write()
                .await
                .remove(&(sheet_id.to_string(), tab_name.to_string()));
        }
        result.map(|_| ())
    }
}
