//! How a hold is laid out in a sheet tab.
//!
//! | A    | B     | C      | D      | E        | F         |
//! |------|-------|--------|--------|----------|-----------|
//! | Date | Venue | Status | Hold # | Priority | Logged On |
//!
//! Row 1 is conventionally a header. Any row whose date cell does not parse is
//! left alone, so headers, notes and hand-made rows survive untouched.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex_lite::Regex;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::ledger::{HoldMutation, HoldRow, HoldStatus, RowRef, SheetRow};

/// Column headers, in order.
pub const HEADERS: [&str; 6] = ["Date", "Venue", "Status", "Hold #", "Priority", "Logged On"];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Date formats accepted when reading cells typed by hand.
const LENIENT_DATE_FORMATS: [&str; 3] = [DATE_FORMAT, "%m/%d/%Y", "%Y/%m/%d"];

static A1_START_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\$?[A-Za-z]+\$?(\d+)").expect("valid A1 regex"));

/// A column of the hold layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldField {
    Date,
    Venue,
    Status,
    HoldNumber,
    Priority,
    LoggedOn,
}

impl HoldField {
    pub fn column(&self) -> char {
        match self {
            HoldField::Date => 'A',
            HoldField::Venue => 'B',
            HoldField::Status => 'C',
            HoldField::HoldNumber => 'D',
            HoldField::Priority => 'E',
            HoldField::LoggedOn => 'F',
        }
    }

    fn index(&self) -> usize {
        (self.column() as u8 - b'A') as usize
    }
}

/// Value written into a single cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Text(String),
    Number(u32),
    Empty,
}

impl Serialize for CellValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            CellValue::Text(text) => serializer.serialize_str(text),
            CellValue::Number(n) => serializer.serialize_u32(*n),
            // An explicit empty string clears the cell; null would leave it as is
            CellValue::Empty => serializer.serialize_str(""),
        }
    }
}

/// One targeted cell write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    pub row_ref: RowRef,
    pub field: HoldField,
    pub value: CellValue,
}

impl CellUpdate {
    /// A1 reference of the target cell, e.g. `'WF-HOLDS'!D7`.
    pub fn a1(&self, tab_name: &str) -> String {
        format!("{}!{}{}", quote_tab(tab_name), self.field.column(), self.row_ref)
    }
}

/// Cell writes that apply a confirmed hold to its row.
pub fn mutation_updates(mutation: &HoldMutation) -> Vec<CellUpdate> {
    vec![
        CellUpdate {
            row_ref: mutation.row_ref,
            field: HoldField::Status,
            value: CellValue::Text(mutation.status.label().to_string()),
        },
        CellUpdate {
            row_ref: mutation.row_ref,
            field: HoldField::HoldNumber,
            value: CellValue::Number(mutation.hold_number),
        },
    ]
}

/// Cells for a new row, in column order.
pub fn encode_row(row: &HoldRow) -> Vec<CellValue> {
    vec![
        CellValue::Text(row.date.format(DATE_FORMAT).to_string()),
        CellValue::Text(row.venue.clone()),
        CellValue::Text(row.status.label().to_string()),
        row.hold_number.map_or(CellValue::Empty, CellValue::Number),
        CellValue::Number(row.priority_rank),
        row.logged_on.map_or(CellValue::Empty, |d| {
            CellValue::Text(d.format(DATE_FORMAT).to_string())
        }),
    ]
}

/// Result of reading one sheet row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRow {
    Hold(SheetRow),
    Blank,
    /// Not a hold row (header, note, bad date); carries the reason.
    Unrecognized(String),
}

/// Parse the cells of one row as returned by the values API.
pub fn parse_row(row_ref: RowRef, cells: &[Value]) -> ParsedRow {
    let text: Vec<String> = cells.iter().map(cell_text).collect();
    let get = |field: HoldField| text.get(field.index()).map(String::as_str).unwrap_or("");

    if text.iter().all(|c| c.is_empty()) {
        return ParsedRow::Blank;
    }

    let Some(date) = parse_date(get(HoldField::Date)) else {
        return ParsedRow::Unrecognized(format!(
            "date cell '{}' is not a date",
            get(HoldField::Date)
        ));
    };

    let venue = get(HoldField::Venue);
    if venue.is_empty() {
        return ParsedRow::Unrecognized("venue cell is empty".to_string());
    }

    ParsedRow::Hold(SheetRow {
        row_ref,
        hold: HoldRow {
            date,
            venue: venue.to_string(),
            status: HoldStatus::from_label(get(HoldField::Status)),
            hold_number: parse_number(get(HoldField::HoldNumber)),
            priority_rank: parse_number(get(HoldField::Priority)).unwrap_or(0),
            logged_on: parse_date(get(HoldField::LoggedOn)),
        },
    })
}

/// Quote a tab name for use in an A1 range.
pub fn quote_tab(tab_name: &str) -> String {
    format!("'{}'", tab_name.replace('\'', "''"))
}

/// Range covering every hold column of a tab.
pub fn data_range(tab_name: &str) -> String {
    format!("{}!A:F", quote_tab(tab_name))
}

/// First row number of an A1 range such as `'WF-HOLDS'!A12:F13`.
pub fn range_start_row(range: &str) -> Option<u32> {
    A1_START_ROW
        .captures(range)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    LENIENT_DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}

fn parse_number(text: &str) -> Option<u32> {
    text.trim_start_matches('#').trim().parse().ok()
}
