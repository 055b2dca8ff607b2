//! Application state shared across HTTP handlers

use crate::auth::AuthenticationService;
use crate::config::Config;
use std::sync::Arc;

/// HTTP server state shared across handlers
///
/// The authentication service held here is the template every request is
/// scoped from; it never runs the chain itself.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Service configuration (shared read-only)
    pub config: Arc<Config>,
    /// Authentication registries
    pub auth: Arc<AuthenticationService>,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(config: Config, auth: AuthenticationService) -> Self {
        Self {
            config: Arc::new(config),
            auth: Arc::new(auth),
        }
    }

    /// Get service configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
