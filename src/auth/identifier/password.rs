//! Username/password identifier
//!
//! [`Identifier::resolve`] always verifies the password. Name-only lookup is
//! the separate [`Identifier::lookup`], which the remember-me cookie uses
//! after checking its own signature.

use super::store::{CredentialRecord, CredentialStore, visible_attributes};
use super::{Identifier, PASSWORD, USERNAME};
use crate::auth::types::{Credentials, IdentityRecord, scalar_to_string};
use crate::config::PasswordIdentifierConfig;
use crate::utils::auth::crypto::PasswordHasher;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// Looks a principal up by login name and checks its argon2 hash
pub struct PasswordIdentifier {
    config: PasswordIdentifierConfig,
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    /// Verified against when the principal does not exist
    dummy_hash: String,
}

impl PasswordIdentifier {
    pub fn new(config: PasswordIdentifierConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let hasher = PasswordHasher::new();
        let dummy_hash = hasher.hash("dummy-password-for-timing")?;

        Ok(Self {
            config,
            store,
            hasher,
            dummy_hash,
        })
    }

    /// `false` on mismatch or an unusable stored hash
    fn verify(&self, password: &str, hash: &str) -> bool {
        match self.hasher.verify(password, hash) {
            Ok(matched) => matched,
            Err(e) => {
                warn!("Stored password hash is unusable: {}", e);
                false
            }
        }
    }

    async fn find(&self, username: String) -> Result<Option<CredentialRecord>> {
        self.store
            .find_by(&self.config.fields.username, &Value::String(username))
            .await
    }

    /// Strip the hash column and build the identity
    fn identity_from(&self, mut record: CredentialRecord) -> Result<IdentityRecord> {
        let stored_hash = record
            .remove(&self.config.fields.password)
            .as_ref()
            .and_then(scalar_to_string);

        let attributes = visible_attributes(record, &[], IdentityRecord::DEFAULT_KEY_FIELD)?;
        Ok(IdentityRecord::new(attributes).with_credential_digest(stored_hash))
    }
}

#[async_trait]
impl Identifier for PasswordIdentifier {
    async fn resolve(&self, credentials: &Credentials) -> Result<Option<IdentityRecord>> {
        let username = credentials.get(USERNAME).and_then(scalar_to_string);
        let password = credentials.get(PASSWORD).and_then(scalar_to_string);
        let (Some(username), Some(password)) = (username, password) else {
            return Ok(None);
        };

        let Some(record) = self.find(username).await? else {
            self.verify(&password, &self.dummy_hash);
            debug!("No principal matches the supplied username");
            return Ok(None);
        };

        let matched = match record
            .get(&self.config.fields.password)
            .and_then(scalar_to_string)
        {
            Some(hash) => self.verify(&password, &hash),
            None => {
                self.verify(&password, &self.dummy_hash);
                false
            }
        };
        if !matched {
            debug!("Password mismatch");
            return Ok(None);
        }

        self.identity_from(record).map(Some)
    }

    async fn lookup(&self, credentials: &Credentials) -> Result<Option<IdentityRecord>> {
        let Some(username) = credentials.get(USERNAME).and_then(scalar_to_string) else {
            return Ok(None);
        };

        match self.find(username).await? {
            Some(record) => self.identity_from(record).map(Some),
            None => Ok(None),
        }
    }
}
