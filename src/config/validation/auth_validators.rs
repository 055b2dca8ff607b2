//! Authentication configuration validators
//!
//! Everything a chain needs at runtime is checked here, so a misconfigured
//! chain is rejected before the first request arrives.

use super::trait_def::Validate;
use crate::config::models::*;
use jsonwebtoken::Algorithm;
use std::collections::HashSet;
use std::str::FromStr;
use tracing::debug;

impl Validate for AuthenticationConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating authentication configuration");

        if self.authenticators.is_empty() {
            return Err("At least one authenticator must be configured".to_string());
        }

        let mut identifier_names = HashSet::new();
        for identifier in &self.identifiers {
            let name = identifier.registry_name();
            identifier.validate()?;
            if !identifier_names.insert(name.clone()) {
                return Err(format!("Duplicate identifier name: {}", name));
            }
        }

        let mut authenticator_names = HashSet::new();
        for authenticator in &self.authenticators {
            let name = authenticator.registry_name();
            authenticator
                .validate()
                .map_err(|e| format!("Authenticator {}: {}", name, e))?;
            if !authenticator_names.insert(name.clone()) {
                return Err(format!("Duplicate authenticator name: {}", name));
            }

            match &authenticator.identifier {
                Some(identifier) if !identifier_names.contains(identifier) => {
                    return Err(format!(
                        "Authenticator {} references unknown identifier: {}",
                        name, identifier
                    ));
                }
                None if identifier_names.is_empty() && authenticator.needs_identifier() => {
                    return Err(format!(
                        "Authenticator {} needs an identifier but none are configured",
                        name
                    ));
                }
                _ => {}
            }
        }

        Ok(())
    }
}

impl Validate for IdentifierConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("Identifier name cannot be empty".to_string());
            }
        }

        match &self.kind {
            IdentifierKind::Password(config) => {
                if config.fields.username.is_empty() || config.fields.password.is_empty() {
                    return Err("Password identifier fields cannot be empty".to_string());
                }
            }
            IdentifierKind::JwtSubject(config) => {
                if config.id_field.is_empty() {
                    return Err("JWT subject id field cannot be empty".to_string());
                }
            }
        }

        Ok(())
    }
}

impl AuthenticatorConfig {
    /// Whether the strategy delegates to an identifier at all
    pub fn needs_identifier(&self) -> bool {
        !matches!(&self.kind, AuthenticatorKind::Jwt(jwt) if jwt.return_payload)
    }
}

impl Validate for AuthenticatorConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err("Authenticator name cannot be empty".to_string());
            }
        }

        match &self.kind {
            AuthenticatorKind::Form(config) => config.validate(),
            AuthenticatorKind::HttpBasic(_) => Ok(()),
            AuthenticatorKind::Jwt(config) => config.validate(),
            AuthenticatorKind::Cookie(config) => config.validate(),
        }
    }
}

impl Validate for FormAuthenticatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.fields.username.is_empty() || self.fields.password.is_empty() {
            return Err("Form fields cannot be empty".to_string());
        }

        if let Some(url) = self.login_urls.iter().find(|url| !url.starts_with('/')) {
            return Err(format!("Login URL must be an absolute path: {}", url));
        }

        Ok(())
    }
}

impl Validate for JwtAuthenticatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.header.is_empty() && self.query_param.is_none() {
            return Err("JWT needs a header or a query parameter to read from".to_string());
        }

        let algorithm = parse_algorithm(&self.algorithm)?;
        let symmetric = matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        );

        if symmetric {
            match &self.secret {
                Some(secret) if !secret.is_empty() => {}
                _ => return Err(format!("JWT secret is required for {:?}", algorithm)),
            }
        } else if self.public_key.as_deref().is_none_or(str::is_empty) {
            return Err(format!("JWT public key is required for {:?}", algorithm));
        }

        if self.subject_key.is_empty() {
            return Err("JWT subject key cannot be empty".to_string());
        }

        Ok(())
    }
}

impl Validate for CookieAuthenticatorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("Cookie secret cannot be empty".to_string());
        }

        if self.cookie.name.is_empty() {
            return Err("Cookie name cannot be empty".to_string());
        }

        if self.username_field.is_empty() {
            return Err("Cookie username field cannot be empty".to_string());
        }

        if let Some(same_site) = &self.cookie.same_site {
            if !matches!(
                same_site.to_ascii_lowercase().as_str(),
                "strict" | "lax" | "none"
            ) {
                return Err(format!("Invalid SameSite value: {}", same_site));
            }
        }

        if matches!(self.cookie.max_age, Some(age) if age <= 0) {
            return Err("Cookie max age must be positive".to_string());
        }

        Ok(())
    }
}

/// Parse a configured algorithm name (`HS256`, `RS256`, ...)
pub fn parse_algorithm(name: &str) -> Result<Algorithm, String> {
    Algorithm::from_str(name).map_err(|_| format!("Unsupported JWT algorithm: {}", name))
}
