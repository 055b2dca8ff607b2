//! Credential record storage
//!
//! Identifiers only see the [`CredentialStore`] trait. The in-memory store
//! backs the tests and the demo server; a database-backed store implements
//! the same trait.

use crate::auth::types::loosely_equal;
use crate::config::UserSeed;
use crate::utils::auth::crypto::PasswordHasher;
use crate::utils::error::{AuthError, Result};
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use tracing::debug;

/// One stored principal, column name to value
pub type CredentialRecord = Map<String, Value>;

/// Lookup source for principals
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// First record whose `field` equals `value`.
    ///
    /// `Ok(None)` when nothing matches; `Err` only when the store itself is
    /// unavailable.
    async fn find_by(&self, field: &str, value: &Value) -> Result<Option<CredentialRecord>>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    records: RwLock<Vec<CredentialRecord>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from seed users, hashing plaintext passwords into
    /// `password_field`
    pub fn from_seeds(
        seeds: &[UserSeed],
        password_field: &str,
        hasher: &PasswordHasher,
    ) -> Result<Self> {
        let store = Self::new();
        for seed in seeds {
            let mut record = seed.attributes.clone();
            if let Some(password) = &seed.password {
                record.insert(password_field.to_string(), Value::String(hasher.hash(password)?));
            }
            store.insert(record);
        }

        debug!("Seeded credential store with {} users", seeds.len());
        Ok(store)
    }

    pub fn insert(&self, record: CredentialRecord) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn find_by(&self, field: &str, value: &Value) -> Result<Option<CredentialRecord>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .find(|record| record.get(field).is_some_and(|v| loosely_equal(v, value)))
            .cloned())
    }
}

/// Copy a stored record into identity attributes, dropping `hidden` columns
/// and checking the key column is present
pub(crate) fn visible_attributes(
    mut record: CredentialRecord,
    hidden: &[String],
    key_field: &str,
) -> Result<Map<String, Value>> {
    for field in hidden {
        record.remove(field);
    }

    if !record.contains_key(key_field) {
        return Err(AuthError::storage(format!(
            "Credential record has no '{}' column",
            key_field
        )));
    }

    Ok(record)
}
