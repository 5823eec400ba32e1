//! Operation inputs and results.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ledger::{PriorityTag, SheetRow};

/// Arguments of `log_holds`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogHoldsRequest {
    pub artist: String,
    pub venue: String,
    pub dates: Vec<String>,
}

/// Arguments of `update_holds_status`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UpdateHoldsRequest {
    pub artist: String,
    pub venue: String,
    /// `YYYY-MM-DD` → hold number. Values are validated by the service.
    pub hold_data: Map<String, Value>,
}

/// Arguments of `read_holds_sheet`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReadHoldsRequest {
    pub artist: String,
}

/// A newly written hold row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoggedHold {
    pub date: NaiveDate,
    pub priority_rank: u32,
    pub priority: PriorityTag,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogHoldsResult {
    pub artist: String,
    pub venue: String,
    pub logged: Vec<LoggedHold>,
    /// Dates that were already logged for the venue.
    pub skipped: Vec<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateOutcome {
    Applied,
    NotFound,
}

/// Outcome of one date in a status update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateUpdate {
    pub date: NaiveDate,
    pub outcome: UpdateOutcome,
    pub hold_number: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateHoldsResult {
    pub artist: String,
    pub venue: String,
    /// One entry per requested date, in date order.
    pub updates: Vec<DateUpdate>,
    pub applied: usize,
    pub total: usize,
}

/// Contents of an artist's holds tab.
#[derive(Debug, Clone, Serialize)]
pub struct HoldsSheet {
    pub artist: String,
    pub tab_name: String,
    pub rows: Vec<SheetRow>,
}
