//! Holds ledger: decides how new requests and confirmed hold numbers are
//! merged into an artist's sheet.
//!
//! Everything here is a pure function of the rows passed in. The sheet is the
//! only source of truth, so callers always plan against freshly fetched rows.

mod types;

pub use types::*;

use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Venue names match case-insensitively, ignoring surrounding whitespace.
pub fn same_venue(a: &str, b: &str) -> bool {
    normalize_venue(a) == normalize_venue(b)
}

fn normalize_venue(venue: &str) -> String {
    venue.trim().to_lowercase()
}

/// Plan the rows to append for a batch of hold requests at `venue`.
///
/// Dates already present for the venue, or repeated within the batch, are
/// reported in [`LogPlan::skipped`] and produce no row. New rows get
/// `rank = 1 + rows already held by the venue`, counting rows planned earlier
/// in the same batch.
pub fn plan_log(existing: &[SheetRow], venue: &str, dates: &[NaiveDate]) -> LogPlan {
    let key = normalize_venue(venue);
    let venue_rows: Vec<&HoldRow> = existing
        .iter()
        .map(|r| &r.hold)
        .filter(|h| normalize_venue(&h.venue) == key)
        .collect();

    let mut seen: HashSet<NaiveDate> = venue_rows.iter().map(|h| h.date).collect();
    let mut held = venue_rows.len() as u32;
    let mut plan = LogPlan::default();

    for &date in dates {
        if !seen.insert(date) {
            plan.skipped.push(date);
            continue;
        }

        held += 1;
        plan.rows.push(HoldRow::asked(date, venue.trim(), held));
        plan.formatting.push(PriorityTag::from_rank(held));
    }

    plan
}

/// Plan the cell changes for confirmed hold numbers at `venue`.
///
/// Each date yields either a mutation of its existing row or
/// [`RowNotFound`]; a miss never affects the other dates. Results follow
/// `hold_data` order (ascending date).
pub fn plan_update(
    existing: &[SheetRow],
    venue: &str,
    hold_data: &BTreeMap<NaiveDate, u32>,
) -> UpdatePlan {
    let key = normalize_venue(venue);

    hold_data
        .iter()
        .map(|(&date, &hold_number)| {
            existing
                .iter()
                .find(|r| r.hold.date == date && normalize_venue(&r.hold.venue) == key)
                .map(|row| HoldMutation {
                    row_ref: row.row_ref,
                    date,
                    hold_number,
                    status: HoldStatus::HoldConfirmed,
                })
                .ok_or_else(|| RowNotFound {
                    venue: venue.trim().to_string(),
                    date,
                })
        })
        .collect()
}
