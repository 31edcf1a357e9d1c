//! Shared application state.

use std::sync::Arc;

use archivist_backend::SearchBackend;
use archivist_core::GatewayConfig;

use crate::auth::AuthGate;

/// State handed to every route handler. Built once before the server starts
/// accepting requests and never mutated afterwards.
pub struct AppState {
    pub config: GatewayConfig,
    pub backend: Arc<dyn SearchBackend>,
    pub gate: Arc<dyn AuthGate>,
}

impl AppState {
    pub fn new(
        config: GatewayConfig,
        backend: Arc<dyn SearchBackend>,
        gate: Arc<dyn AuthGate>,
    ) -> Self {
        Self {
            config,
            backend,
            gate,
        }
    }

    /// Index every search and update is sent to.
    pub fn index(&self) -> &str {
        &self.config.elasticsearch_index
    }
}
