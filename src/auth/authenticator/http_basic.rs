//! `Authorization: Basic` credentials

use super::{Authenticator, delegate};
use crate::auth::identifier::{IdentifierSet, PASSWORD, USERNAME};
use crate::auth::request::AuthRequest;
use crate::auth::response::ResponseModification;
use crate::auth::types::{AuthenticationResult, Credentials};
use crate::config::HttpBasicAuthenticatorConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose};
use serde_json::Value;
use tracing::warn;

#[derive(Debug)]
pub struct HttpBasicAuthenticator {
    config: HttpBasicAuthenticatorConfig,
    identifiers: IdentifierSet,
}

impl HttpBasicAuthenticator {
    pub fn new(config: HttpBasicAuthenticatorConfig, identifiers: IdentifierSet) -> Self {
        Self {
            config,
            identifiers,
        }
    }

    /// Decode `Basic <base64(user:password)>`
    fn parse_header(value: &str) -> Option<(String, String)> {
        let (scheme, encoded) = value.trim().split_once(' ')?;
        if !scheme.eq_ignore_ascii_case("basic") {
            return None;
        }

        let decoded = general_purpose::STANDARD.decode(encoded.trim()).ok()?;
        let decoded = String::from_utf8(decoded).ok()?;
        let (username, password) = decoded.split_once(':')?;
        if username.is_empty() {
            return None;
        }

        Some((username.to_string(), password.to_string()))
    }
}

#[async_trait]
impl Authenticator for HttpBasicAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<AuthenticationResult> {
        let Some((username, password)) = request.header("authorization").and_then(Self::parse_header)
        else {
            return Ok(AuthenticationResult::unresolved());
        };

        let mut credentials = Credentials::new();
        credentials.insert(USERNAME.to_string(), Value::String(username));
        credentials.insert(PASSWORD.to_string(), Value::String(password));

        delegate(&self.identifiers, &credentials).await
    }

    fn challenge(&self, request: &AuthRequest) -> Option<ResponseModification> {
        if self.config.skip_challenge {
            return None;
        }

        let realm = self
            .config
            .realm
            .as_deref()
            .or(request.host())
            .unwrap_or_default();

        match ResponseModification::challenge(&format!("Basic realm=\"{}\"", realm)) {
            Ok(challenge) => Some(challenge),
            Err(e) => {
                warn!("Cannot build Basic challenge: {}", e);
                None
            }
        }
    }
}
