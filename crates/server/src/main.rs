use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use holds_core::{
    create_authenticator, load_config, validate_config, ArtistDirectory, AuthMethod,
    Authenticator, GoogleSheetsGateway, HoldsService, SheetGateway, UnconfiguredGateway,
};
use holds_server::{api::create_router, state::AppState};

/// Environment variable naming the config file.
const CONFIG_ENV: &str = "HOLDS_CONFIG";

/// Config file read when `HOLDS_CONFIG` is unset. May be absent.
const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine config path; an explicit path must exist
    let config_path = match std::env::var(CONFIG_ENV) {
        Ok(path) => Some(PathBuf::from(path)),
        Err(_) => {
            let default = PathBuf::from(DEFAULT_CONFIG_PATH);
            default.exists().then_some(default)
        }
    };

    // Load configuration
    match &config_path {
        Some(path) => info!("Loading configuration from {:?}", path),
        None => info!("No config file found, using environment only"),
    }
    let config = load_config(config_path.as_deref())
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    info!("Auth method: {:?}", config.auth.method);
    if config.auth.method == AuthMethod::None {
        warn!("Authentication disabled; set HOLDS_AUTH__METHOD=api_key to require a key");
    }

    // Create authenticator
    let authenticator: Arc<dyn Authenticator> = Arc::from(
        create_authenticator(&config.auth).context("Failed to create authenticator")?,
    );
    info!("Using authenticator: {}", authenticator.method_name());

    // Build the artist directory
    let directory = ArtistDirectory::new(config.artists.overrides.as_deref())
        .context("Failed to load artist directory")?;
    info!(
        "Artist directory ready: {}",
        directory.artist_keys().join(", ")
    );

    // Create the sheet gateway
    let credentials_present = config
        .google
        .credentials
        .as_deref()
        .is_some_and(|c| !c.trim().is_empty());

    let gateway: Arc<dyn SheetGateway> = if credentials_present {
        let gateway = GoogleSheetsGateway::new(&config.google)
            .context("Failed to initialize Google Sheets gateway")?;
        info!(
            "Initializing Google Sheets gateway at {}",
            config.google.sheets_base_url
        );
        Arc::new(gateway)
    } else {
        warn!("No Google credentials configured; every sheet operation will fail");
        Arc::new(UnconfiguredGateway)
    };

    let service = HoldsService::new(Arc::new(directory), gateway);

    // Create app state
    let state = Arc::new(AppState::new(config.clone(), authenticator, service));

    // Create router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(config.server.host, config.server.port);
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shut down");

    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
