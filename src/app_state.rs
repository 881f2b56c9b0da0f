//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::GatewayConfig;
use crate::service::PairingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Matchmaking and relay.
    pub pairing: PairingService,
    /// Loaded configuration.
    pub config: Arc<GatewayConfig>,
}

impl AppState {
    /// Builds the state for `config` with an empty matchmaking state.
    #[must_use]
    pub fn new(config: GatewayConfig) -> Self {
        Self {
            pairing: PairingService::new(config.rematch_delay),
            config: Arc::new(config),
        }
    }
}
