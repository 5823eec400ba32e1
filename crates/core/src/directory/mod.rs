//! Artist directory: which spreadsheet and tab hold each roster's holds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

use crate::config::ConfigError;
use crate::service::HoldsError;

/// Where one artist's holds live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtistConfig {
    pub artist_key: String,
    pub sheet_id: String,
    pub tab_name: String,
}

/// Shape of one entry in the override blob.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SheetTarget {
    sheet_id: String,
    tab_name: String,
}

/// Built-in roster.
const DEFAULT_ARTISTS: &[(&str, &str, &str)] = &[
    (
        "weakened-friends",
        "1fzf0x89ElPiz5961PXFRyJ43tZAWMxvUza-Zl-fJHKI",
        "WF-HOLDS",
    ),
    (
        "ballroom-thieves",
        "13N0uM5uUqyPk6LSSzUXY4GFs5DXuAy0VjgI6akdqs0s",
        "TBT- Holds",
    ),
];

/// Immutable artist → sheet mapping, built once at startup.
#[derive(Debug, Clone)]
pub struct ArtistDirectory {
    artists: BTreeMap<String, ArtistConfig>,
}

impl ArtistDirectory {
    /// Build from the built-in roster, layering `overrides` (a JSON object of
    /// `artist-key -> {sheet_id, tab_name}`) on top.
    pub fn new(overrides: Option<&str>) -> Result<Self, ConfigError> {
        let mut artists: BTreeMap<String, ArtistConfig> = DEFAULT_ARTISTS
            .iter()
            .map(|(key, sheet_id, tab_name)| {
                (
                    key.to_string(),
                    ArtistConfig {
                        artist_key: key.to_string(),
                        sheet_id: sheet_id.to_string(),
                        tab_name: tab_name.to_string(),
                    },
                )
            })
            .collect();

        if let Some(raw) = overrides {
            let parsed = parse_overrides(raw)?;
            info!("Loaded {} artist override(s)", parsed.len());
            artists.extend(parsed.into_iter().map(|a| (a.artist_key.clone(), a)));
        }

        Ok(Self { artists })
    }

    /// Directory with exactly the given entries and no built-in roster.
    pub fn from_entries(entries: impl IntoIterator<Item = ArtistConfig>) -> Self {
        Self {
            artists: entries
                .into_iter()
                .map(|a| (a.artist_key.clone(), a))
                .collect(),
        }
    }

    pub fn resolve(&self, artist_key: &str) -> Result<&ArtistConfig, HoldsError> {
        self.artists
            .get(artist_key)
            .ok_or_else(|| HoldsError::UnknownArtist(artist_key.to_string()))
    }

    /// Known artist keys, sorted.
    pub fn artist_keys(&self) -> Vec<String> {
        self.artists.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.artists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artists.is_empty()
    }
}

/// Keys that collide with fixed paths under `/holds/`.
pub const RESERVED_ARTIST_KEYS: [&str; 2] = ["log", "status"];

fn parse_overrides(raw: &str) -> Result<Vec<ArtistConfig>, ConfigError> {
    let entries: BTreeMap<String, SheetTarget> = serde_json::from_str(raw).map_err(|e| {
        ConfigError::ParseError(format!("artist overrides are not a valid JSON map: {}", e))
    })?;

    entries
        .into_iter()
        .map(|(key, target)| {
            let artist_key = key.trim();
            if artist_key.is_empty() {
                return Err(ConfigError::ValidationError(
                    "artist overrides contain an empty artist key".to_string(),
                ));
            }
            if RESERVED_ARTIST_KEYS.contains(&artist_key) {
                return Err(ConfigError::ValidationError(format!(
                    "artist key '{}' is reserved",
                    artist_key
                )));
            }
            if target.sheet_id.trim().is_empty() || target.tab_name.trim().is_empty() {
                return Err(ConfigError::ValidationError(format!(
                    "artist override '{}' needs a non-empty sheet_id and tab_name",
                    artist_key
                )));
            }
            Ok(ArtistConfig {
                artist_key: artist_key.to_string(),
                sheet_id: target.sheet_id.trim().to_string(),
                tab_name: target.tab_name,
            })
        })
        .collect()
}
