//! Core configuration validators
//!
//! Validation for the server section, the middleware options and the seed
//! users of the in-memory credential store.

use super::trait_def::Validate;
use crate::config::models::*;
use tracing::debug;

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating server configuration");

        if self.host.is_empty() {
            return Err("Server host cannot be empty".to_string());
        }

        if self.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err("Worker count must be greater than 0".to_string());
            }
        }

        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }

        Ok(())
    }
}

impl Validate for MiddlewareConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating middleware configuration");

        if self.identity_attribute.is_empty() {
            return Err("Identity attribute cannot be empty".to_string());
        }

        if matches!(&self.unauthenticated_redirect, Some(url) if url.is_empty()) {
            return Err("Unauthenticated redirect cannot be empty".to_string());
        }

        if matches!(&self.query_param, Some(param) if param.is_empty()) {
            return Err("Redirect query parameter cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for UserSeed {
    fn validate(&self) -> Result<(), String> {
        if self.attributes.is_empty() {
            return Err("Seed user must have attributes".to_string());
        }

        if matches!(&self.password, Some(password) if password.is_empty()) {
            return Err("Seed user password cannot be empty".to_string());
        }

        Ok(())
    }
}
