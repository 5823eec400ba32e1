use std::sync::Arc;
use holds_core::{Authenticator, Config, HoldsService, SanitizedConfig};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    service: HoldsService,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        service: HoldsService,
    ) -> Self {
        Self {
            config,
            authenticator,
            service,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn service(&self) -> &HoldsService {
        &self.service
    }
}
