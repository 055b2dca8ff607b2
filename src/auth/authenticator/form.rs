//! Username/password posted in the request body

use super::{Authenticator, delegate};
use crate::auth::identifier::{IdentifierSet, PASSWORD, USERNAME};
use crate::auth::request::AuthRequest;
use crate::auth::types::{AuthenticationResult, Credentials, scalar_to_string};
use crate::config::FormAuthenticatorConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

#[derive(Debug)]
pub struct FormAuthenticator {
    config: FormAuthenticatorConfig,
    identifiers: IdentifierSet,
}

impl FormAuthenticator {
    pub fn new(config: FormAuthenticatorConfig, identifiers: IdentifierSet) -> Self {
        Self {
            config,
            identifiers,
        }
    }

    fn accepts_path(&self, path: &str) -> bool {
        self.config.login_urls.is_empty() || self.config.login_urls.iter().any(|url| url == path)
    }

    fn field(request: &AuthRequest, name: &str) -> Option<String> {
        request
            .body_field(name)
            .and_then(scalar_to_string)
            .filter(|value| !value.is_empty())
    }
}

#[async_trait]
impl Authenticator for FormAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<AuthenticationResult> {
        if !self.accepts_path(request.path()) {
            debug!("Form login not accepted on {}", request.path());
            return Ok(AuthenticationResult::unresolved());
        }

        let username = Self::field(request, &self.config.fields.username);
        let password = Self::field(request, &self.config.fields.password);
        let (Some(username), Some(password)) = (username, password) else {
            return Ok(AuthenticationResult::unresolved());
        };

        let mut credentials = Credentials::new();
        credentials.insert(USERNAME.to_string(), Value::String(username));
        credentials.insert(PASSWORD.to_string(), Value::String(password));

        delegate(&self.identifiers, &credentials).await
    }
}
