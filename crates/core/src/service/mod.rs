//! Request dispatcher for the three holds operations.
//!
//! Every call resolves the artist, validates its input, then runs
//! read → plan → write against the artist's sheet. Nothing is cached between
//! calls: the sheet is re-read each time.

mod types;

pub use types::*;

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::directory::{ArtistConfig, ArtistDirectory};
use crate::gateway::{layout, GatewayError, SheetGateway};
use crate::ledger::{plan_log, plan_update, SheetRow};
use crate::metrics::{HOLDS_LOGGED, HOLDS_SKIPPED, HOLD_UPDATES};

/// Dates must be written exactly as `YYYY-MM-DD`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors returned by the holds operations.
#[derive(Debug, Error)]
pub enum HoldsError {
    #[error("Unknown artist: {0}")]
    UnknownArtist(String),

    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl HoldsError {
    fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        HoldsError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Short machine-readable kind, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            HoldsError::UnknownArtist(_) => "unknown_artist",
            HoldsError::Validation { .. } => "validation_error",
            HoldsError::Gateway(_) => "gateway_error",
        }
    }
}

/// Dispatches holds operations to the ledger and the sheet gateway.
pub struct HoldsService {
    directory: Arc<ArtistDirectory>,
    gateway: Arc<dyn SheetGateway>,
}

impl HoldsService {
    pub fn new(directory: Arc<ArtistDirectory>, gateway: Arc<dyn SheetGateway>) -> Self {
        Self { directory, gateway }
    }

    pub fn directory(&self) -> &ArtistDirectory {
        &self.directory
    }

    pub fn gateway_name(&self) -> &str {
        self.gateway.name()
    }

    /// Record hold requests for a venue.
    ///
    /// Dates already logged for the venue are reported as skipped. New rows are
    /// appended in input order and coloured by priority; a colouring failure
    /// is logged and does not fail the call.
    pub async fn log_holds(
        &self,
        artist: &str,
        venue: &str,
        dates: &[String],
    ) -> Result<LogHoldsResult, HoldsError> {
        let target = self.directory.resolve(artist)?;
        let venue = validate_venue(venue)?;
        if dates.is_empty() {
            return Err(HoldsError::validation("dates", "at least one date is required"));
        }
        let dates = dates
            .iter()
            .map(|d| parse_date("dates", d))
            .collect::<Result<Vec<_>, _>>()?;

        info!(
            "Logging {} hold(s) for {} at '{}'",
            dates.len(),
            artist,
            venue
        );

        let existing = self.fetch(target).await?;
        let mut plan = plan_log(&existing, venue, &dates);

        HOLDS_SKIPPED.inc_by(plan.skipped.len() as u64);

        if plan.is_noop() {
            info!(
                "All {} date(s) already logged for {} at '{}'",
                dates.len(),
                artist,
                venue
            );
            return Ok(LogHoldsResult {
                artist: artist.to_string(),
                venue: venue.to_string(),
                logged: Vec::new(),
                skipped: plan.skipped,
            });
        }

        let today = Utc::now().date_naive();
        for row in &mut plan.rows {
            row.logged_on = Some(today);
        }

        let row_refs = self
            .gateway
            .append_rows(&target.sheet_id, &target.tab_name, &plan.rows)
            .await?;

        HOLDS_LOGGED.inc_by(plan.rows.len() as u64);

        for (row_ref, tag) in row_refs.iter().zip(&plan.formatting) {
            if let Err(e) = self
                .gateway
                .apply_style(&target.sheet_id, &target.tab_name, *row_ref, *tag)
                .await
            {
                warn!(
                    "Failed to colour row {} of '{}' as {}: {}",
                    row_ref, target.tab_name, tag, e
                );
            }
        }

        info!(
            "Logged {} hold(s) for {} at '{}' ({} skipped)",
            plan.rows.len(),
            artist,
            venue,
            plan.skipped.len()
        );

        Ok(LogHoldsResult {
            artist: artist.to_string(),
            venue: venue.to_string(),
            logged: plan
                .rows
                .iter()
                .zip(&plan.formatting)
                .map(|(row, tag)| LoggedHold {
                    date: row.date,
                    priority_rank: row.priority_rank,
                    priority: *tag,
                })
                .collect(),
            skipped: plan.skipped,
        })
    }

    /// Mark held dates as confirmed with the hold numbers the venue gave.
    ///
    /// `hold_data` maps `YYYY-MM-DD` to a non-negative integer. Dates with no
    /// logged row are reported as `not_found`; no rows are created.
    pub async fn update_holds_status(
        &self,
        artist: &str,
        venue: &str,
        hold_data: &Map<String, Value>,
    ) -> Result<UpdateHoldsResult, HoldsError> {
        let target = self.directory.resolve(artist)?;
        let venue = validate_venue(venue)?;
        let hold_data = validate_hold_data(hold_data)?;

        info!(
            "Updating {} hold(s) for {} at '{}'",
            hold_data.len(),
            artist,
            venue
        );

        let existing = self.fetch(target).await?;
        let plan = plan_update(&existing, venue, &hold_data);

        let updates: Vec<_> = plan
            .iter()
            .filter_map(|entry| entry.as_ref().ok())
            .flat_map(layout::mutation_updates)
            .collect();

        if !updates.is_empty() {
            self.gateway
                .mutate_cells(&target.sheet_id, &target.tab_name, &updates)
                .await?;
        }

        let updates: Vec<DateUpdate> = plan
            .into_iter()
            .map(|entry| match entry {
                Ok(mutation) => DateUpdate {
                    date: mutation.date,
                    outcome: UpdateOutcome::Applied,
                    hold_number: mutation.hold_number,
                },
                Err(missing) => {
                    debug!("{}", missing);
                    DateUpdate {
                        date: missing.date,
                        outcome: UpdateOutcome::NotFound,
                        hold_number: hold_data[&missing.date],
                    }
                }
            })
            .collect();

        let applied = updates
            .iter()
            .filter(|u| u.outcome == UpdateOutcome::Applied)
            .count();
        let total = updates.len();

        HOLD_UPDATES
            .with_label_values(&["applied"])
            .inc_by(applied as u64);
        HOLD_UPDATES
            .with_label_values(&["not_found"])
            .inc_by((total - applied) as u64);

        info!(
            "Updated {}/{} hold(s) for {} at '{}'",
            applied, total, artist, venue
        );

        Ok(UpdateHoldsResult {
            artist: artist.to_string(),
            venue: venue.to_string(),
            updates,
            applied,
            total,
        })
    }

    /// Every hold row in the artist's sheet, as stored.
    pub async fn read_holds_sheet(&self, artist: &str) -> Result<HoldsSheet, HoldsError> {
        let target = self.directory.resolve(artist)?;

        debug!("Reading holds sheet for {}", artist);

        let rows = self.fetch(target).await?;

        Ok(HoldsSheet {
            artist: artist.to_string(),
            tab_name: target.tab_name.clone(),
            rows,
        })
    }

    async fn fetch(&self, target: &ArtistConfig) -> Result<Vec<SheetRow>, HoldsError> {
        let rows = self
            .gateway
            .fetch_rows(&target.sheet_id, &target.tab_name)
            .await
            .map_err(|e| {
                warn!(
                    "Failed to read '{}' for {} via {}: {}",
                    target.tab_name,
                    target.artist_key,
                    self.gateway.name(),
                    e
                );
                e
            })?;

        debug!(
            "Read {} row(s) from '{}' for {}",
            rows.len(),
            target.tab_name,
            target.artist_key
        );

        Ok(rows)
    }
}

fn validate_venue(venue: &str) -> Result<&str, HoldsError> {
    let venue = venue.trim();
    if venue.is_empty() {
        return Err(HoldsError::validation("venue", "must not be empty"));
    }
    Ok(venue)
}

/// Parse a strict `YYYY-MM-DD` date.
fn parse_date(field: &str, text: &str) -> Result<NaiveDate, HoldsError> {
    // chrono tolerates padding, signs and unpadded fields; only the canonical form passes
    match NaiveDate::parse_from_str(text, DATE_FORMAT) {
        Ok(date) if date.format(DATE_FORMAT).to_string() == text => Ok(date),
        _ => Err(HoldsError::validation(
            field,
            format!("'{}' is not a valid YYYY-MM-DD date", text),
        )),
    }
}

fn validate_hold_data(
    hold_data: &Map<String, Value>,
) -> Result<BTreeMap<NaiveDate, u32>, HoldsError> {
    if hold_data.is_empty() {
        return Err(HoldsError::validation(
            "hold_data",
            "at least one date is required",
        ));
    }

    let mut parsed = BTreeMap::new();
    for (key, value) in hold_data {
        let date = parse_date("hold_data", key)?;
        let number = value
            .as_u64()
            .and_then(|n| u32::try_from(n).ok())
            .ok_or_else(|| {
                HoldsError::validation(
                    "hold_data",
                    format!(
                        "hold number for {} must be a non-negative integer, got {}",
                        key, value
                    ),
                )
            })?;
        if parsed.insert(date, number).is_some() {
            return Err(HoldsError::validation(
                "hold_data",
                format!("date {} appears more than once", date),
            ));
        }
    }
    Ok(parsed)
}
