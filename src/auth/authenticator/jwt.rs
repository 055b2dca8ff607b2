//! Signed bearer tokens
//!
//! The token is read from the configured header (`Authorization: Bearer
//! <token>` by default) or, failing that, from a query parameter. Only the
//! verified subject is handed to the identifiers; with `return_payload` set
//! the claims become the identity themselves.

use super::Authenticator;
use crate::auth::identifier::{IdentifierSet, JWT_SUBJECT};
use crate::auth::request::AuthRequest;
use crate::auth::types::{AuthenticationResult, Credentials, FailureReason, IdentityRecord};
use crate::config::JwtAuthenticatorConfig;
use crate::config::validation::parse_algorithm;
use crate::utils::error::{AuthError, Result};
use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, warn};

pub struct JwtAuthenticator {
    config: JwtAuthenticatorConfig,
    /// `None` when the payload is the identity
    identifiers: Option<IdentifierSet>,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtAuthenticator {
    pub fn new(config: JwtAuthenticatorConfig, identifiers: Option<IdentifierSet>) -> Result<Self> {
        let algorithm = parse_algorithm(&config.algorithm).map_err(AuthError::config)?;
        if identifiers.is_none() && !config.return_payload {
            return Err(AuthError::config(
                "JWT authenticator needs an identifier unless return_payload is set",
            ));
        }

        let decoding_key = Self::decoding_key(&config, algorithm)?;

        let mut validation = Validation::new(algorithm);
        validation.leeway = config.leeway;
        validation.validate_nbf = true;
        validation.required_spec_claims = HashSet::new();
        if let Some(issuer) = &config.issuer {
            validation.set_issuer(&[issuer]);
        }
        if config.audience.is_empty() {
            validation.validate_aud = false;
        } else {
            validation.set_audience(config.audience.as_slice());
        }

        Ok(Self {
            config,
            identifiers,
            decoding_key,
            validation,
        })
    }

    fn decoding_key(config: &JwtAuthenticatorConfig, algorithm: Algorithm) -> Result<DecodingKey> {
        let missing = || AuthError::config(format!("No key configured for {:?}", algorithm));

        let key = match algorithm {
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => {
                let secret = config.secret.as_deref().ok_or_else(missing)?;
                DecodingKey::from_secret(secret.as_bytes())
            }
            Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512 => {
                let pem = config.public_key.as_deref().ok_or_else(missing)?;
                DecodingKey::from_rsa_pem(pem.as_bytes())?
            }
            Algorithm::ES256 | Algorithm::ES384 => {
                let pem = config.public_key.as_deref().ok_or_else(missing)?;
                DecodingKey::from_ec_pem(pem.as_bytes())?
            }
            Algorithm::EdDSA => {
                let pem = config.public_key.as_deref().ok_or_else(missing)?;
                DecodingKey::from_ed_pem(pem.as_bytes())?
            }
        };

        Ok(key)
    }

    /// Token from the header, or from the query string
    fn extract_token(&self, request: &AuthRequest) -> Option<String> {
        let from_header = request.header(&self.config.header).and_then(|value| {
            let value = value.trim();
            if self.config.token_prefix.is_empty() {
                return Some(value.to_string());
            }
            let (prefix, token) = value.split_once(' ')?;
            prefix
                .eq_ignore_ascii_case(&self.config.token_prefix)
                .then(|| token.trim().to_string())
        });

        from_header
            .or_else(|| {
                self.config
                    .query_param
                    .as_deref()
                    .and_then(|param| request.query_param(param))
            })
            .filter(|token| !token.is_empty())
    }
}

#[async_trait]
impl Authenticator for JwtAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<AuthenticationResult> {
        let Some(token) = self.extract_token(request) else {
            return Ok(AuthenticationResult::unresolved());
        };

        let claims = match decode::<Credentials>(&token, &self.decoding_key, &self.validation) {
            Ok(data) => data.claims,
            Err(e) => {
                warn!("JWT verification failed: {}", e);
                return Ok(
                    AuthenticationResult::failure(FailureReason::CredentialsInvalid)
                        .with_error(e.to_string()),
                );
            }
        };

        let Some(subject) = claims.get(&self.config.subject_key).cloned() else {
            debug!("Verified token carries no '{}'", self.config.subject_key);
            return Ok(AuthenticationResult::failure(FailureReason::CredentialsMissing));
        };

        let identity = match &self.identifiers {
            Some(identifiers) => {
                let mut credentials = Credentials::new();
                credentials.insert(JWT_SUBJECT.to_string(), subject);
                identifiers.resolve(&credentials).await?
            }
            None => Some(
                IdentityRecord::new(claims.clone()).with_key_field(self.config.subject_key.clone()),
            ),
        };

        match identity {
            Some(identity) => {
                debug!("JWT resolved to a principal");
                Ok(AuthenticationResult::success(
                    identity.with_original_payload(claims),
                ))
            }
            None => Ok(AuthenticationResult::failure(FailureReason::IdentityNotFound)),
        }
    }
}

impl fmt::Debug for JwtAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtAuthenticator")
            .field("header", &self.config.header)
            .field("query_param", &self.config.query_param)
            .field("algorithm", &self.config.algorithm)
            .field("identifiers", &self.identifiers)
            .finish()
    }
}
