//! Identifier resolvers
//!
//! An identifier turns raw credentials (a username/password pair, verified
//! token claims) into an [`IdentityRecord`]. Strategies never touch the
//! credential store themselves; they hand what they extracted to the
//! identifiers they were configured with.

pub mod jwt_subject;
pub mod password;
pub mod store;


pub use jwt_subject::JwtSubjectIdentifier;
pub use password::PasswordIdentifier;
pub use store::{CredentialRecord, CredentialStore, InMemoryCredentialStore};

use crate::auth::types::{Credentials, IdentityRecord};
use crate::config::{IdentifierConfig, IdentifierKind};
use crate::utils::error::{AuthError, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::info;

/// Credential key carrying the login name
pub const USERNAME: &str = "username";
/// Credential key carrying the plaintext secret
pub const PASSWORD: &str = "password";
/// Credential key carrying a verified token subject
pub const JWT_SUBJECT: &str = "sub";

/// Maps credentials to a principal
#[async_trait]
pub trait Identifier: Send + Sync {
    /// `Ok(None)` when no principal matches or the secret is wrong.
    /// `Err` is reserved for infrastructure failures.
    async fn resolve(&self, credentials: &Credentials) -> Result<Option<IdentityRecord>>;

    /// Find a principal without checking any secret.
    ///
    /// Only for callers that proved possession some other way, like a signed
    /// remember-me cookie. Identifiers that cannot look up by name alone
    /// keep the default and find nothing.
    async fn lookup(&self, _credentials: &Credentials) -> Result<Option<IdentityRecord>> {
        Ok(None)
    }
}

/// Ordered name → identifier registry
#[derive(Clone, Default)]
pub struct IdentifierCollection {
    entries: Vec<(String, Arc<dyn Identifier>)>,
}

impl IdentifierCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every configured identifier against one store
    pub fn from_config(
        configs: &[IdentifierConfig],
        store: Arc<dyn CredentialStore>,
    ) -> Result<Self> {
        let mut collection = Self::new();
        for config in configs {
            let identifier: Arc<dyn Identifier> = match &config.kind {
                IdentifierKind::Password(options) => {
                    Arc::new(PasswordIdentifier::new(options.clone(), store.clone())?)
                }
                IdentifierKind::JwtSubject(options) => {
                    Arc::new(JwtSubjectIdentifier::new(options.clone(), store.clone()))
                }
            };
            collection.insert(config.registry_name(), identifier)?;
        }

        info!("Registered identifiers: {:?}", collection.names());
        Ok(collection)
    }

    /// Register under a unique name
    pub fn insert<S: Into<String>>(&mut self, name: S, identifier: Arc<dyn Identifier>) -> Result<()> {
        let name = name.into();
        if self.has(&name) {
            return Err(AuthError::duplicate(format!("identifier {}", name)));
        }
        self.entries.push((name, identifier));
        Ok(())
    }

    pub fn has(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Identifier>> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, identifier)| identifier.clone())
    }

    /// Names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Identifier>)> {
        self.entries.iter().map(|(n, i)| (n.as_str(), i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The identifiers a strategy delegates to: the named one, or every
    /// registered identifier in order when no name is given
    pub fn select(&self, name: Option<&str>) -> Result<IdentifierSet> {
        let members = match name {
            Some(name) => {
                let identifier = self
                    .get(name)
                    .ok_or_else(|| AuthError::unknown_identifier(name))?;
                vec![(name.to_string(), identifier)]
            }
            None => self.entries.clone(),
        };

        if members.is_empty() {
            return Err(AuthError::config("No identifiers are registered"));
        }

        Ok(IdentifierSet { members })
    }
}

impl fmt::Debug for IdentifierCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// Identifiers bound to one strategy
#[derive(Clone)]
pub struct IdentifierSet {
    members: Vec<(String, Arc<dyn Identifier>)>,
}

impl IdentifierSet {
    /// Try each member in order; the first match wins
    pub async fn resolve(&self, credentials: &Credentials) -> Result<Option<IdentityRecord>> {
        for (_, identifier) in &self.members {
            if let Some(identity) = identifier.resolve(credentials).await? {
                return Ok(Some(identity));
            }
        }
        Ok(None)
    }

    /// [`Identifier::lookup`] on each member in order
    pub async fn lookup(&self, credentials: &Credentials) -> Result<Option<IdentityRecord>> {
        for (_, identifier) in &self.members {
            if let Some(identity) = identifier.lookup(credentials).await? {
                return Ok(Some(identity));
            }
        }
        Ok(None)
    }

    pub fn names(&self) -> Vec<&str> {
        self.members.iter().map(|(n, _)| n.as_str()).collect()
    }
}

impl fmt::Debug for IdentifierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
