//! Configuration management
//!
//! This module handles loading, validation, and environment overrides of the
//! service configuration.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{AuthError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

/// Overrides the secret of every JWT authenticator
pub const JWT_SECRET_ENV: &str = "AUTHN_JWT_SECRET";
/// Overrides the secret of every cookie authenticator
pub const COOKIE_SECRET_ENV: &str = "AUTHN_COOKIE_SECRET";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub authentication: AuthenticationConfig,
    #[serde(default)]
    pub middleware: MiddlewareConfig,
    /// Seed records for the in-memory credential store
    #[serde(default)]
    pub users: Vec<UserSeed>,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| AuthError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse, apply environment overrides and validate
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut config: Config = serde_yaml::from_str(content)
            .map_err(|e| AuthError::Config(format!("Failed to parse config: {}", e)))?;

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Replace configured secrets with values from the environment
    pub fn apply_env_overrides(&mut self) {
        let jwt_secret = std::env::var(JWT_SECRET_ENV).ok();
        let cookie_secret = std::env::var(COOKIE_SECRET_ENV).ok();
        self.override_secrets(jwt_secret, cookie_secret);
    }

    fn override_secrets(&mut self, jwt_secret: Option<String>, cookie_secret: Option<String>) {
        for authenticator in &mut self.authentication.authenticators {
            match &mut authenticator.kind {
                AuthenticatorKind::Jwt(jwt) => {
                    if let Some(secret) = jwt_secret.as_ref().filter(|s| !s.is_empty()) {
                        debug!("Using {} for authenticator secret", JWT_SECRET_ENV);
                        jwt.secret = Some(secret.clone());
                    }
                }
                AuthenticatorKind::Cookie(cookie) => {
                    if let Some(secret) = cookie_secret.as_ref().filter(|s| !s.is_empty()) {
                        debug!("Using {} for authenticator secret", COOKIE_SECRET_ENV);
                        cookie.secret = secret.clone();
                    }
                }
                _ => {}
            }
        }
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.server
            .validate()
            .map_err(|e| AuthError::Config(format!("Server config error: {}", e)))?;

        self.authentication
            .validate()
            .map_err(|e| AuthError::Config(format!("Authentication config error: {}", e)))?;

        self.middleware
            .validate()
            .map_err(|e| AuthError::Config(format!("Middleware config error: {}", e)))?;

        for user in &self.users {
            user.validate()
                .map_err(|e| AuthError::Config(format!("User config error: {}", e)))?;
        }

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| AuthError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
