pub mod auth;
pub mod config;
pub mod directory;
pub mod gateway;
pub mod ledger;
pub mod metrics;
pub mod service;
pub mod testing;

pub use auth::{
    create_authenticator, AuthError, AuthRequest, Authenticator, Identity, NoneAuthenticator,
};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthMethod, Config, ConfigError,
    SanitizedConfig,
};
pub use directory::{ArtistConfig, ArtistDirectory};
pub use gateway::{GatewayError, GoogleSheetsGateway, SheetGateway, UnconfiguredGateway};
pub use ledger::{plan_log, plan_update, HoldRow, HoldStatus, PriorityTag, RowRef, SheetRow};
pub use service::{HoldsError, HoldsService};
