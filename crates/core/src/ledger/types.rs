//! Hold records and planning outputs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// State of a hold request as recorded in the sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldStatus {
    /// The promoter has been asked to place a hold.
    AskedHold,
    /// The venue confirmed a hold and gave it a number.
    HoldConfirmed,
    Declined,
    Released,
    /// Free text entered by hand in the sheet.
    Other(String),
}

impl HoldStatus {
    /// Text written to the status cell.
    pub fn label(&self) -> &str {
        match self {
            HoldStatus::AskedHold => "Asked Hold",
            HoldStatus::HoldConfirmed => "Hold Confirmed",
            HoldStatus::Declined => "Declined",
            HoldStatus::Released => "Released",
            HoldStatus::Other(text) => text,
        }
    }

    /// Parse a status cell. Matching is case-insensitive and tolerates a
    /// trailing annotation, e.g. `Asked Hold (04/30)`.
    pub fn from_label(text: &str) -> Self {
        let normalized = text.trim().to_lowercase();
        let known = [
            ("asked hold", HoldStatus::AskedHold),
            ("hold confirmed", HoldStatus::HoldConfirmed),
            ("declined", HoldStatus::Declined),
            ("released", HoldStatus::Released),
        ];

        known
            .into_iter()
            .find(|(prefix, _)| normalized.starts_with(prefix))
            .map(|(_, status)| status)
            .unwrap_or_else(|| HoldStatus::Other(text.trim().to_string()))
    }
}

impl fmt::Display for HoldStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One hold request: a venue and a date for one artist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldRow {
    pub date: NaiveDate,
    pub venue: String,
    pub status: HoldStatus,
    pub hold_number: Option<u32>,
    /// Order in which this venue's dates were first logged (1-based).
    /// 0 when the sheet cell is blank or unreadable.
    pub priority_rank: u32,
    /// Day the request was logged, when known.
    pub logged_on: Option<NaiveDate>,
}

impl HoldRow {
    /// A freshly requested hold.
    pub fn asked(date: NaiveDate, venue: impl Into<String>, priority_rank: u32) -> Self {
        Self {
            date,
            venue: venue.into(),
            status: HoldStatus::AskedHold,
            hold_number: None,
            priority_rank,
            logged_on: None,
        }
    }

    pub fn priority(&self) -> Option<PriorityTag> {
        (self.priority_rank > 0).then(|| PriorityTag::from_rank(self.priority_rank))
    }
}

/// 1-based row number within a sheet tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RowRef(pub u32);

impl fmt::Display for RowRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hold together with the sheet row it was read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetRow {
    pub row_ref: RowRef,
    #[serde(flatten)]
    pub hold: HoldRow,
}

/// Visual priority of a hold, derived only from its rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriorityTag {
    #[serde(rename = "first")]
    First,
    #[serde(rename = "second")]
    Second,
    #[serde(rename = "third")]
    Third,
    #[serde(rename = "fourth-plus")]
    FourthPlus,
}

impl PriorityTag {
    pub fn from_rank(rank: u32) -> Self {
        match rank {
            0 | 1 => PriorityTag::First,
            2 => PriorityTag::Second,
            3 => PriorityTag::Third,
            _ => PriorityTag::FourthPlus,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PriorityTag::First => "first",
            PriorityTag::Second => "second",
            PriorityTag::Third => "third",
            PriorityTag::FourthPlus => "fourth-plus",
        }
    }
}

impl fmt::Display for PriorityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`plan_log`](super::plan_log).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogPlan {
    /// Rows to append, in input date order.
    pub rows: Vec<HoldRow>,
    /// Style for each appended row; `formatting[i]` belongs to `rows[i]`.
    pub formatting: Vec<PriorityTag>,
    /// Requested dates that were already logged for the venue.
    pub skipped: Vec<NaiveDate>,
}

impl LogPlan {
    pub fn is_noop(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A confirmed hold to write onto an existing row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldMutation {
    pub row_ref: RowRef,
    pub date: NaiveDate,
    pub hold_number: u32,
    pub status: HoldStatus,
}

/// An update named a venue/date that was never logged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("No hold logged for {venue} on {date}")]
pub struct RowNotFound {
    pub venue: String,
    pub date: NaiveDate,
}

/// Per-date result of [`plan_update`](super::plan_update).
pub type UpdatePlan = Vec<Result<HoldMutation, RowNotFound>>;
