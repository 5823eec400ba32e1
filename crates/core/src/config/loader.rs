use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Environment variable carrying the service-account key blob.
pub const CREDENTIALS_ENV: &str = "GOOGLE_SHEETS_CREDENTIALS";

/// Environment variable carrying the artist directory override blob.
pub const ARTIST_OVERRIDES_ENV: &str = "ARTIST_SHEETS_CONFIG";

/// Load configuration from an optional TOML file with environment overrides.
///
/// Precedence, lowest first: file, `PORT`, `HOLDS_<SECTION>__<KEY>`, then the
/// raw JSON blobs in `GOOGLE_SHEETS_CREDENTIALS` / `ARTIST_SHEETS_CONFIG`.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();

    if let Some(path) = path {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }
        figment = figment.merge(Toml::file(path));
    }

    let mut config: Config = figment
        .merge(Env::raw().only(&["PORT"]).map(|_| "server.port".into()))
        .merge(Env::prefixed("HOLDS_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    // JSON blobs are copied verbatim; figment would try to interpret them.
    apply_env_blobs(&mut config, |key| std::env::var(key).ok());

    Ok(config)
}

/// Copy the credential and override blobs from `lookup` into `config`.
pub fn apply_env_blobs<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(credentials) = lookup(CREDENTIALS_ENV).filter(|v| !v.trim().is_empty()) {
        config.google.credentials = Some(credentials);
    }
    if let Some(overrides) = lookup(ARTIST_OVERRIDES_ENV).filter(|v| !v.trim().is_empty()) {
        config.artists.overrides = Some(overrides);
    }
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}
