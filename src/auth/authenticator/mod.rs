//! Authenticator strategies
//!
//! Each strategy looks for one kind of credential in the request. When the
//! credential is absent it answers [`AuthStatus::Unresolved`] so the next
//! strategy in the chain gets a turn.
//!
//! [`AuthStatus::Unresolved`]: crate::auth::types::AuthStatus::Unresolved

pub mod cookie;
pub mod form;
pub mod http_basic;
pub mod jwt;


pub use cookie::CookieAuthenticator;
pub use form::FormAuthenticator;
pub use http_basic::HttpBasicAuthenticator;
pub use jwt::JwtAuthenticator;

use crate::auth::identifier::{IdentifierCollection, IdentifierSet};
use crate::auth::request::AuthRequest;
use crate::auth::response::ResponseModification;
use crate::auth::types::{AuthenticationResult, Credentials, FailureReason, IdentityRecord};
use crate::config::{AuthenticatorConfig, AuthenticatorKind, Validate};
use crate::utils::error::{AuthError, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// One authentication strategy
///
/// Only `authenticate` is required. The other hooks default to doing nothing.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// `Err` only for infrastructure failures; a rejected credential is a
    /// failure result.
    async fn authenticate(&self, request: &AuthRequest) -> Result<AuthenticationResult>;

    /// Response prompting the client for credentials
    fn challenge(&self, _request: &AuthRequest) -> Option<ResponseModification> {
        None
    }

    /// Write durable re-authentication material after a successful login
    async fn persist(
        &self,
        _request: &AuthRequest,
        _identity: &IdentityRecord,
    ) -> Result<ResponseModification> {
        Ok(ResponseModification::new())
    }

    /// Undo whatever `persist` wrote
    fn clear_identity(&self) -> ResponseModification {
        ResponseModification::new()
    }
}

/// Hand credentials to the identifiers; no match is an invalid credential
pub(crate) async fn delegate(
    identifiers: &IdentifierSet,
    credentials: &Credentials,
) -> Result<AuthenticationResult> {
    match identifiers.resolve(credentials).await? {
        Some(identity) => Ok(AuthenticationResult::success(identity)),
        None => Ok(AuthenticationResult::failure(FailureReason::CredentialsInvalid)),
    }
}

/// Ordered name → authenticator registry
#[derive(Clone, Default)]
pub struct AuthenticatorCollection {
    entries: Vec<(String, Arc<dyn Authenticator>)>,
}

impl AuthenticatorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the configured strategies, binding each to its identifiers
    pub fn from_config(
        configs: &[AuthenticatorConfig],
        identifiers: &IdentifierCollection,
    ) -> Result<Self> {
        let mut collection = Self::new();
        for config in configs {
            let name = config.registry_name();
            config
                .validate()
                .map_err(|e| AuthError::config(format!("Authenticator {}: {}", name, e)))?;

            let authenticator = build(config, identifiers)?;
            collection.insert(name, authenticator)?;
        }

        info!("Registered authenticators: {:?}", collection.names());
        Ok(collection)
    }

    /// Append under a unique name; order of insertion is evaluation order
    pub fn insert<S: Into<String>>(
        &mut self,
        name: S,
        authenticator: Arc<dyn Authenticator>,
    ) -> Result<()> {
        let name = name.into();
        if self.has(&name) {
            return Err(AuthError::duplicate(format!("authenticator {}", name)));
        }
        self.entries.push((name, authenticator));
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Authenticator>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, authenticator)| authenticator.clone())
    }

    /// Like [`get`](Self::get), for callers that cannot continue without it
    pub fn require(&self, name: &str) -> Result<Arc<dyn Authenticator>> {
        self.get(name)
            .ok_or_else(|| AuthError::unknown_authenticator(name))
    }

    /// Names in evaluation order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Authenticator>)> {
        self.entries.iter().map(|(n, a)| (n.as_str(), a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for AuthenticatorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

fn build(
    config: &AuthenticatorConfig,
    identifiers: &IdentifierCollection,
) -> Result<Arc<dyn Authenticator>> {
    let select = || identifiers.select(config.identifier.as_deref());

    let authenticator: Arc<dyn Authenticator> = match &config.kind {
        AuthenticatorKind::Form(options) => {
            Arc::new(FormAuthenticator::new(options.clone(), select()?))
        }
        AuthenticatorKind::HttpBasic(options) => {
            Arc::new(HttpBasicAuthenticator::new(options.clone(), select()?))
        }
        AuthenticatorKind::Jwt(options) => {
            let bound = if options.return_payload && config.identifier.is_none() {
                None
            } else {
                Some(select()?)
            };
            Arc::new(JwtAuthenticator::new(options.clone(), bound)?)
        }
        AuthenticatorKind::Cookie(options) => {
            Arc::new(CookieAuthenticator::new(options.clone(), select()?)?)
        }
    };

    Ok(authenticator)
}
