use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub artists: ArtistsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    5000
}

/// Authentication configuration. Absent means no authentication.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub method: AuthMethod,
    /// Shared key for the `api_key` method.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    #[default]
    None,
    ApiKey,
}

/// Google Sheets access configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GoogleConfig {
    /// Service-account key as a JSON blob. When absent the server starts,
    /// but every sheet operation fails as not configured.
    #[serde(default, skip_serializing)]
    pub credentials: Option<String>,
    /// Sheets API base URL (default: https://sheets.googleapis.com/v4)
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            sheets_base_url: default_sheets_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com/v4".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Artist directory configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ArtistsConfig {
    /// JSON object of `artist-key -> {sheet_id, tab_name}` entries layered
    /// over the built-in roster.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overrides: Option<String>,
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub auth: SanitizedAuthConfig,
    pub server: ServerConfig,
    pub google: SanitizedGoogleConfig,
    pub artists: SanitizedArtistsConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedAuthConfig {
    pub method: String,
}

/// Sanitized Google config (credentials hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedGoogleConfig {
    pub credentials_configured: bool,
    pub sheets_base_url: String,
    pub timeout_secs: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedArtistsConfig {
    pub overrides_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            auth: SanitizedAuthConfig {
                method: match config.auth.method {
                    AuthMethod::None => "none".to_string(),
                    AuthMethod::ApiKey => "api_key".to_string(),
                },
            },
            server: config.server.clone(),
            google: SanitizedGoogleConfig {
                credentials_configured: config
                    .google
                    .credentials
                    .as_ref()
                    .is_some_and(|c| !c.trim().is_empty()),
                sheets_base_url: config.google.sheets_base_url.clone(),
                timeout_secs: config.google.timeout_secs,
            },
            artists: SanitizedArtistsConfig {
                overrides_configured: config.artists.overrides.is_some(),
            },
        }
    }
}
