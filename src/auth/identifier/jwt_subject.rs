//! Token subject identifier

use super::store::{CredentialStore, visible_attributes};
use super::{Identifier, JWT_SUBJECT};
use crate::auth::types::{Credentials, IdentityRecord};
use crate::config::JwtSubjectIdentifierConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Resolves a verified token subject to the stored principal it names
pub struct JwtSubjectIdentifier {
    config: JwtSubjectIdentifierConfig,
    store: Arc<dyn CredentialStore>,
}

impl JwtSubjectIdentifier {
    pub fn new(config: JwtSubjectIdentifierConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self { config, store }
    }
}

#[async_trait]
impl Identifier for JwtSubjectIdentifier {
    async fn resolve(&self, credentials: &Credentials) -> Result<Option<IdentityRecord>> {
        let Some(subject) = credentials.get(JWT_SUBJECT) else {
            debug!("Credentials carry no token subject");
            return Ok(None);
        };

        let Some(record) = self.store.find_by(&self.config.id_field, subject).await? else {
            return Ok(None);
        };

        let attributes =
            visible_attributes(record, &self.config.hidden_fields, &self.config.id_field)?;
        Ok(Some(
            IdentityRecord::new(attributes).with_key_field(self.config.id_field.clone()),
        ))
    }
}
