//! OAuth access tokens for a Google service account.
//!
//! A service account signs a short-lived RS256 JWT with its private key and
//! exchanges it at the token endpoint for a bearer token (the
//! `jwt-bearer` grant). Tokens are reused until shortly before they expire.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::ConfigError;
use crate::gateway::GatewayError;

/// Scope needed to read and write spreadsheet values and formatting.
pub const SHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";

const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;
/// Refresh this long before the reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Source of bearer tokens for the Sheets API.
#[async_trait]
pub trait TokenSource: Send + Sync {
    async fn access_token(&self) -> Result<String, GatewayError>;
}

/// A fixed token, for tests and for tokens minted outside the process.
#[derive(Debug, Clone)]
pub struct StaticToken(pub String);

#[async_trait]
impl TokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, GatewayError> {
        Ok(self.0.clone())
    }
}

/// The fields of a service-account key file this service uses.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub token_uri: Option<String>,
}

impl ServiceAccountKey {
    /// Parse the JSON key blob.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let key: ServiceAccountKey = serde_json::from_str(json).map_err(|e| {
            ConfigError::ParseError(format!("service-account credentials are not valid: {}", e))
        })?;

        if key.client_email.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "service-account credentials have an empty client_email".to_string(),
            ));
        }

        Ok(key)
    }
}

#[derive(Debug, Serialize)]
struct Claims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: u64,
}

fn default_expires_in() -> u64 {
    3600
}

struct CachedToken {
    token: String,
    refresh_at: Instant,
}

/// Mints and caches access tokens for one service account.
pub struct ServiceAccountTokenSource {
    client: Client,
    client_email: String,
    token_uri: String,
    encoding_key: EncodingKey,
    cached: Mutex<Option<CachedToken>>,
}

impl ServiceAccountTokenSource {
    /// Build from a parsed key. Fails if the private key is not valid PEM.
    pub fn new(key: ServiceAccountKey, client: Client) -> Result<Self, ConfigError> {
        let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            ConfigError::ValidationError(format!(
                "service-account private_key is not a valid RSA PEM key: {}",
                e
            ))
        })?;

        Ok(Self {
            client,
            client_email: key.client_email,
            token_uri: key
                .token_uri
                .unwrap_or_else(|| DEFAULT_TOKEN_URI.to_string()),
            encoding_key,
            cached: Mutex::new(None),
        })
    }

    fn assertion(&self) -> Result<String, GatewayError> {
        let iat = chrono::Utc::now().timestamp();
        let claims = Claims {
            iss: &self.client_email,
            scope: SHEETS_SCOPE,
            aud: &self.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        };

        jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &self.encoding_key)
            .map_err(|e| GatewayError::Auth(format!("failed to sign token assertion: {}", e)))
    }

    async fn exchange(&self) -> Result<TokenResponse, GatewayError> {
        let assertion = self.assertion()?;

        debug!("Requesting access token for {}", self.client_email);

        let response = self
            .client
            .post(&self.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Auth(format!(
                "token endpoint returned {}: {}",
                status.as_u16(),
                body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| GatewayError::Parse(format!("Failed to parse token response: {}", e)))
    }
}

#[async_trait]
impl TokenSource for ServiceAccountTokenSource {
    async fn access_token(&self) -> Result<String, GatewayError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.refresh_at {
                return Ok(token.token.clone());
            }
        }

        let response = self.exchange().await?;
        let lifetime = Duration::from_secs(response.expires_in).saturating_sub(EXPIRY_MARGIN);

        *cached = Some(CachedToken {
            token: response.access_token.clone(),
            refresh_at: Instant::now() + lifetime,
        });

        Ok(response.access_token)
    }
}
