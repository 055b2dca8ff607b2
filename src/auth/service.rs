//! Per-request authentication service

use crate::auth::authenticator::AuthenticatorCollection;
use crate::auth::identifier::{CredentialStore, IdentifierCollection};
use crate::auth::request::AuthRequest;
use crate::auth::response::ResponseModification;
use crate::auth::types::{AuthenticationResult, IdentityRecord};
use crate::config::{AuthenticationConfig, Validate};
use crate::utils::error::{AuthError, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, info};

/// Registries shared by every request
struct Registry {
    identifiers: IdentifierCollection,
    authenticators: AuthenticatorCollection,
}

/// What the chain produced for this request
#[derive(Debug)]
struct Outcome {
    result: Arc<AuthenticationResult>,
    authenticated_by: Option<String>,
}

/// Runs the authenticator chain and remembers its outcome
///
/// The registries are shared; the outcome is not. Obtain a fresh service
/// for each request with [`scoped`](Self::scoped).
pub struct AuthenticationService {
    registry: Arc<Registry>,
    outcome: OnceCell<Outcome>,
}

impl AuthenticationService {
    pub fn new(
        identifiers: IdentifierCollection,
        authenticators: AuthenticatorCollection,
    ) -> Result<Self> {
        if authenticators.is_empty() {
            return Err(AuthError::config("At least one authenticator must be configured"));
        }

        Ok(Self {
            registry: Arc::new(Registry {
                identifiers,
                authenticators,
            }),
            outcome: OnceCell::new(),
        })
    }

    /// Build the identifiers and the chain described by `config`
    pub fn from_config(
        config: &AuthenticationConfig,
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        config.validate().map_err(AuthError::config)?;

        let identifiers = IdentifierCollection::from_config(&config.identifiers, store)?;
        let authenticators =
            AuthenticatorCollection::from_config(&config.authenticators, &identifiers)?;

        info!(
            "Authentication service ready with {} authenticators and {} identifiers",
            authenticators.len(),
            identifiers.len()
        );
        Self::new(identifiers, authenticators)
    }

    /// A service sharing this one's registries with no outcome yet
    pub fn scoped(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            outcome: OnceCell::new(),
        }
    }

    /// Run the chain once.
    ///
    /// Later calls return the same result without running any strategy or
    /// identifier again, whatever request they are given.
    pub async fn authenticate(&self, request: &AuthRequest) -> Result<Arc<AuthenticationResult>> {
        let outcome = self
            .outcome
            .get_or_try_init(|| self.run_chain(request))
            .await?;
        Ok(outcome.result.clone())
    }

    async fn run_chain(&self, request: &AuthRequest) -> Result<Outcome> {
        for (name, authenticator) in self.registry.authenticators.iter() {
            let result = authenticator.authenticate(request).await?;

            if result.is_unresolved() {
                debug!("{} found no credentials", name);
                continue;
            }

            match result.failure_reason() {
                Some(reason) => debug!("{} rejected the request: {}", name, reason),
                None => debug!("{} authenticated the request", name),
            }
            return Ok(Outcome {
                result: Arc::new(result),
                authenticated_by: Some(name.to_string()),
            });
        }

        debug!("No authenticator found credentials");
        Ok(Outcome {
            result: Arc::new(AuthenticationResult::unresolved()),
            authenticated_by: None,
        })
    }

    /// Outcome of [`authenticate`](Self::authenticate), if it ran
    pub fn result(&self) -> Option<Arc<AuthenticationResult>> {
        self.outcome.get().map(|outcome| outcome.result.clone())
    }

    /// Name of the strategy that decided the outcome
    pub fn authenticated_by(&self) -> Option<&str> {
        self.outcome
            .get()
            .and_then(|outcome| outcome.authenticated_by.as_deref())
    }

    /// The resolved identity, when authentication succeeded
    pub fn identity(&self) -> Option<Arc<IdentityRecord>> {
        self.result()
            .and_then(|result| result.identity().cloned())
    }

    pub fn identifiers(&self) -> &IdentifierCollection {
        &self.registry.identifiers
    }

    pub fn authenticators(&self) -> &AuthenticatorCollection {
        &self.registry.authenticators
    }

    /// Collect what every strategy wants written after a successful login
    pub async fn persist_identity(
        &self,
        request: &AuthRequest,
        identity: &IdentityRecord,
    ) -> Result<ResponseModification> {
        let mut modification = ResponseModification::new();
        for (_, authenticator) in self.registry.authenticators.iter() {
            modification.merge(authenticator.persist(request, identity).await?);
        }
        Ok(modification)
    }

    /// Collect every strategy's logout output
    pub fn clear_identity(&self) -> ResponseModification {
        let mut modification = ResponseModification::new();
        for (_, authenticator) in self.registry.authenticators.iter() {
            modification.merge(authenticator.clear_identity());
        }
        modification
    }

    /// The first challenge offered by a chain member
    pub fn challenge(&self, request: &AuthRequest) -> Option<ResponseModification> {
        self.registry
            .authenticators
            .iter()
            .find_map(|(_, authenticator)| authenticator.challenge(request))
    }
}

impl fmt::Debug for AuthenticationService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationService")
            .field("identifiers", &self.registry.identifiers)
            .field("authenticators", &self.registry.authenticators)
            .field("outcome", &self.outcome.get())
            .finish()
    }
}

/// Source of a per-request [`AuthenticationService`]
pub trait AuthenticationServiceProvider: Send + Sync {
    fn authentication_service(&self, request: &AuthRequest) -> Result<AuthenticationService>;
}

impl AuthenticationServiceProvider for AuthenticationService {
    fn authentication_service(&self, _request: &AuthRequest) -> Result<AuthenticationService> {
        Ok(self.scoped())
    }
}
