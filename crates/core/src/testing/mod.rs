//! Testing utilities and mock implementations.
//!
//! This module provides an in-memory sheet gateway and fixtures, allowing the
//! holds service and the HTTP server to be tested without Google Sheets.
//!
//! # Example
//!
//! ```rust,ignore
//! use holds_core::testing::{fixtures, MockSheetGateway};
//!
//! let gateway = Arc::new(MockSheetGateway::new());
//! let service = HoldsService::new(Arc::new(fixtures::directory()), gateway.clone());
//!
//! // Use in AppState...
//! ```

mod mock_sheet_gateway;

pub use mock_sheet_gateway::{GatewayCalls, MockSheetGateway};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::directory::{ArtistConfig, ArtistDirectory};
    use crate::ledger::HoldRow;

    pub const WF_SHEET: &str = "wf-sheet";
    pub const WF_TAB: &str = "WF-HOLDS";
    pub const TBT_SHEET: &str = "tbt-sheet";
    pub const TBT_TAB: &str = "TBT- Holds";

    /// Directory with the two standard artists pointing at test sheet ids.
    pub fn directory() -> ArtistDirectory {
        ArtistDirectory::from_entries([
            ArtistConfig {
                artist_key: "weakened-friends".to_string(),
                sheet_id: WF_SHEET.to_string(),
                tab_name: WF_TAB.to_string(),
            },
            ArtistConfig {
                artist_key: "ballroom-thieves".to_string(),
                sheet_id: TBT_SHEET.to_string(),
                tab_name: TBT_TAB.to_string(),
            },
        ])
    }

    /// Parse a `YYYY-MM-DD` date.
    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("fixture date must be YYYY-MM-DD")
    }

    /// An asked hold at `venue` on `date` with the given rank.
    pub fn hold(venue: &str, date_str: &str, rank: u32) -> HoldRow {
        HoldRow::asked(date(date_str), venue, rank)
    }
}
