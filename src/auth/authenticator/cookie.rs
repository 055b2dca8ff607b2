//! Remember-me cookie
//!
//! The cookie holds the URL-encoded JSON array `[identifier, token]` where
//! `token` is an HMAC over the identifier and the principal's stored
//! password hash. Changing the password therefore invalidates every issued
//! cookie.

use super::Authenticator;
use crate::auth::identifier::{IdentifierSet, USERNAME};
use crate::auth::request::AuthRequest;
use crate::auth::response::ResponseModification;
use crate::auth::types::{
    AuthenticationResult, Credentials, FailureReason, IdentityRecord, is_truthy, scalar_to_string,
};
use crate::config::CookieAuthenticatorConfig;
use crate::utils::auth::crypto::{sign_token, verify_token};
use crate::utils::error::{AuthError, Result};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, SameSite};
use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use tracing::debug;
use url::form_urlencoded;

pub struct CookieAuthenticator {
    config: CookieAuthenticatorConfig,
    identifiers: IdentifierSet,
}

impl CookieAuthenticator {
    pub fn new(config: CookieAuthenticatorConfig, identifiers: IdentifierSet) -> Result<Self> {
        if config.secret.is_empty() {
            return Err(AuthError::config("Cookie authenticator requires a secret"));
        }

        Ok(Self {
            config,
            identifiers,
        })
    }

    /// Cookie value for a principal
    pub fn encode_value(identifier: &str, token: &str) -> String {
        let json = Value::from(vec![identifier, token]).to_string();
        form_urlencoded::byte_serialize(json.as_bytes()).collect()
    }

    /// `(identifier, token)` from a cookie value
    pub fn decode_value(raw: &str) -> Option<(String, String)> {
        let (json, _) = form_urlencoded::parse(raw.as_bytes()).next()?;
        let parts: Vec<Value> = serde_json::from_str(&json).ok()?;

        match parts.as_slice() {
            [identifier, Value::String(token)] => {
                let identifier = scalar_to_string(identifier)?;
                (!identifier.is_empty()).then(|| (identifier, token.clone()))
            }
            _ => None,
        }
    }

    fn token_for(&self, identifier: &str, identity: &IdentityRecord) -> Result<String> {
        let digest = identity.credential_digest().unwrap_or_default();
        sign_token(&self.config.secret, &[identifier, digest])
    }

    fn build_cookie(&self, value: String) -> Cookie<'static> {
        let options = &self.config.cookie;
        let mut cookie = Cookie::new(options.name.clone(), value);
        cookie.set_path(options.path.clone());
        cookie.set_secure(options.secure);
        cookie.set_http_only(options.http_only);
        if let Some(domain) = &options.domain {
            cookie.set_domain(domain.clone());
        }
        if let Some(same_site) = options.same_site.as_deref().and_then(parse_same_site) {
            cookie.set_same_site(same_site);
        }
        if let Some(max_age) = options.max_age {
            cookie.set_max_age(Duration::seconds(max_age));
        }
        cookie
    }
}

fn parse_same_site(value: &str) -> Option<SameSite> {
    match value.to_ascii_lowercase().as_str() {
        "strict" => Some(SameSite::Strict),
        "lax" => Some(SameSite::Lax),
        "none" => Some(SameSite::None),
        _ => None,
    }
}

#[async_trait]
impl Authenticator for CookieAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<AuthenticationResult> {
        let Some(raw) = request.cookie(&self.config.cookie.name) else {
            return Ok(AuthenticationResult::unresolved());
        };

        let Some((identifier, token)) = Self::decode_value(raw) else {
            debug!("Undecodable remember-me cookie");
            return Ok(AuthenticationResult::failure(FailureReason::CredentialsInvalid)
                .with_error("Cookie value could not be decoded"));
        };

        let mut credentials = Credentials::new();
        credentials.insert(USERNAME.to_string(), Value::String(identifier.clone()));

        let Some(identity) = self.identifiers.lookup(&credentials).await? else {
            return Ok(AuthenticationResult::failure(FailureReason::IdentityNotFound));
        };

        let digest = identity.credential_digest().unwrap_or_default();
        if !verify_token(&self.config.secret, &[identifier.as_str(), digest], &token)? {
            debug!("Remember-me token mismatch");
            return Ok(AuthenticationResult::failure(FailureReason::CredentialsInvalid));
        }

        Ok(AuthenticationResult::success(identity))
    }

    async fn persist(
        &self,
        request: &AuthRequest,
        identity: &IdentityRecord,
    ) -> Result<ResponseModification> {
        let remember = request
            .body_field(&self.config.remember_me_field)
            .is_some_and(is_truthy);
        if !remember {
            return Ok(ResponseModification::new());
        }

        let Some(identifier) = identity.get_str(&self.config.username_field) else {
            debug!(
                "Identity has no '{}', not issuing a remember-me cookie",
                self.config.username_field
            );
            return Ok(ResponseModification::new());
        };

        let token = self.token_for(&identifier, identity)?;
        let cookie = self.build_cookie(Self::encode_value(&identifier, &token));
        Ok(ResponseModification::new().with_cookie(cookie))
    }

    fn clear_identity(&self) -> ResponseModification {
        let mut cookie = self.build_cookie(String::new());
        cookie.make_removal();
        ResponseModification::new().with_cookie(cookie)
    }
}

impl fmt::Debug for CookieAuthenticator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CookieAuthenticator")
            .field("cookie", &self.config.cookie.name)
            .field("identifiers", &self.identifiers)
            .finish()
    }
}
