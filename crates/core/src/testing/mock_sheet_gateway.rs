//! Mock sheet gateway for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::gateway::{CellUpdate, CellValue, GatewayError, HoldField, SheetGateway};
use crate::ledger::{HoldRow, HoldStatus, PriorityTag, RowRef, SheetRow};

/// Row 1 of every mock tab is the header.
const FIRST_DATA_ROW: u32 = 2;

/// Number of calls made to each gateway operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GatewayCalls {
    pub fetch_rows: usize,
    pub append_rows: usize,
    pub mutate_cells: usize,
    pub apply_style: usize,
}

impl GatewayCalls {
    pub fn total(&self) -> usize {
        self.fetch_rows + self.append_rows + self.mutate_cells + self.apply_style
    }
}

type TabKey = (String, String);

/// In-memory implementation of the SheetGateway trait.
///
/// Each `(sheet_id, tab_name)` pair holds its own rows, starting at row 2.
/// Cell updates are applied to the stored rows so reads after writes see the
/// change.
///
/// # Example
///
/// ```rust,ignore
/// use holds_core::testing::{fixtures, MockSheetGateway};
///
/// let gateway = Arc::new(MockSheetGateway::new());
/// gateway.seed(fixtures::WF_SHEET, fixtures::WF_TAB, vec![
///     fixtures::hold("The Sinclair", "2026-04-30", 1),
/// ]).await;
///
/// let service = HoldsService::new(Arc::new(fixtures::directory()), gateway.clone());
/// service.log_holds("weakened-friends", "The Sinclair", &dates).await?;
///
/// assert_eq!(gateway.calls().await.append_rows, 1);
/// ```
#[derive(Default)]
pub struct MockSheetGateway {
    tabs: Arc<RwLock<HashMap<TabKey, Vec<HoldRow>>>>,
    /// Styles applied, in call order.
    styles: Arc<RwLock<Vec<(RowRef, PriorityTag)>>>,
    calls: Arc<RwLock<GatewayCalls>>,
    /// If set, the next call fails with this error.
    next_error: Arc<RwLock<Option<GatewayError>>>,
    /// If set, every apply_style call fails.
    fail_styles: Arc<RwLock<bool>>,
}

impl std::fmt::Debug for MockSheetGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSheetGateway")
            .field("tabs", &"<tabs>")
            .field("styles", &"<styles>")
            .field("calls", &"<calls>")
            .finish()
    }
}

impl MockSheetGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the rows of a tab.
    pub async fn seed(&self, sheet_id: &str, tab_name: &str, rows: Vec<HoldRow>) {
        self.tabs.write().await.insert(key(sheet_id, tab_name), rows);
    }

    /// Current rows of a tab, with their row numbers.
    pub async fn rows(&self, sheet_id: &str, tab_name: &str) -> Vec<SheetRow> {
        self.tabs
            .read()
            .await
            .get(&key(sheet_id, tab_name))
            .map(|rows| with_refs(rows))
            .unwrap_or_default()
    }

    /// Styles applied so far.
    pub async fn styled_rows(&self) -> Vec<(RowRef, PriorityTag)> {
        self.styles.read().await.clone()
    }

    pub async fn calls(&self) -> GatewayCalls {
        *self.calls.read().await
    }

    /// Configure the next call to fail with the given error.
    pub async fn set_next_error(&self, error: GatewayError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every apply_style call fail.
    pub async fn fail_styles(&self, fail: bool) {
        *self.fail_styles.write().await = fail;
    }

    async fn take_error(&self) -> Result<(), GatewayError> {
        match self.next_error.write().await.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn key(sheet_id: &str, tab_name: &str) -> TabKey {
    (sheet_id.to_string(), tab_name.to_string())
}

fn with_refs(rows: &[HoldRow]) -> Vec<SheetRow> {
    rows.iter()
        .enumerate()
        .map(|(i, hold)| SheetRow {
            row_ref: RowRef(FIRST_DATA_ROW + i as u32),
            hold: hold.clone(),
        })
        .collect()
}

#[async_trait]
impl SheetGateway for MockSheetGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_rows(
        &self,
        sheet_id: &str,
        tab_name: &str,
    ) -> Result<Vec<SheetRow>, GatewayError> {
        self.calls.write().await.fetch_rows += 1;
        self.take_error().await?;

        Ok(self.rows(sheet_id, tab_name).await)
    }

    async fn append_rows(
        &self,
        sheet_id: &str,
        tab_name: &str,
        rows: &[HoldRow],
    ) -> Result<Vec<RowRef>, GatewayError> {
        self.calls.write().await.append_rows += 1;
        self.take_error().await?;

        let mut tabs = self.tabs.write().await;
        let tab = tabs.entry(key(sheet_id, tab_name)).or_default();
        let start = FIRST_DATA_ROW + tab.len() as u32;
        tab.extend_from_slice(rows);

        Ok((0..rows.len() as u32).map(|i| RowRef(start + i)).collect())
    }

    async fn mutate_cells(
        &self,
        sheet_id: &str,
        tab_name: &str,
        updates: &[CellUpdate],
    ) -> Result<(), GatewayError> {
        self.calls.write().await.mutate_cells += 1;
        self.take_error().await?;

        let mut tabs = self.tabs.write().await;
        let tab = tabs.entry(key(sheet_id, tab_name)).or_default();

        for update in updates {
            let index = update
                .row_ref
                .0
                .checked_sub(FIRST_DATA_ROW)
                .map(|i| i as usize)
                .filter(|&i| i < tab.len())
                .ok_or_else(|| GatewayError::Api {
                    status: 400,
                    message: format!("row {} is outside the tab", update.row_ref),
                })?;
            let row = &mut tab[index];

            match (update.field, &update.value) {
                (HoldField::Status, CellValue::Text(text)) => {
                    row.status = HoldStatus::from_label(text)
                }
                (HoldField::HoldNumber, CellValue::Number(n)) => row.hold_number = Some(*n),
                (HoldField::HoldNumber, CellValue::Empty) => row.hold_number = None,
                (HoldField::Priority, CellValue::Number(n)) => row.priority_rank = *n,
                (HoldField::Venue, CellValue::Text(text)) => row.venue = text.clone(),
                (field, value) => {
                    return Err(GatewayError::Api {
                        status: 400,
                        message: format!("mock cannot write {:?} into {:?}", value, field),
                    })
                }
            }
        }

        Ok(())
    }

    async fn apply_style(
        &self,
        _sheet_id: &str,
        tab_name: &str,
        row_ref: RowRef,
        tag: PriorityTag,
    ) -> Result<(), GatewayError> {
        self.calls.write().await.apply_style += 1;
        self.take_error().await?;

        if *self.fail_styles.read().await {
            return Err(GatewayError::SheetNotFound(tab_name.to_string()));
        }

        self.styles.write().await.push((row_ref, tag));
        Ok(())
    }
}
