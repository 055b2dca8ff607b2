//! Request extractors for authentication state

use crate::auth::{AuthenticationResult, AuthenticationService, IdentityRecord};
use crate::utils::error::Unauthenticated;
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{Ready, ready};
use std::ops::Deref;
use std::sync::Arc;

/// Authentication state of the current request
///
/// Inserted by the middleware on every request it handles, whatever the
/// outcome.
#[derive(Debug, Clone)]
pub struct AuthenticationContext {
    service: Arc<AuthenticationService>,
    identity_attribute: Arc<str>,
}

impl AuthenticationContext {
    pub fn new(service: Arc<AuthenticationService>, identity_attribute: &str) -> Self {
        Self {
            service,
            identity_attribute: Arc::from(identity_attribute),
        }
    }

    pub fn service(&self) -> &AuthenticationService {
        &self.service
    }

    pub fn result(&self) -> Option<Arc<AuthenticationResult>> {
        self.service.result()
    }

    pub fn identity(&self) -> Option<Arc<IdentityRecord>> {
        self.service.identity()
    }

    /// Name the identity is published under
    pub fn identity_attribute(&self) -> &str {
        &self.identity_attribute
    }

    /// Look a request attribute up by name; only the identity attribute is
    /// known
    pub fn attribute(&self, name: &str) -> Option<Arc<IdentityRecord>> {
        if name == &*self.identity_attribute {
            self.identity()
        } else {
            None
        }
    }
}

impl FromRequest for AuthenticationContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthenticationContext>()
                .cloned()
                .ok_or_else(|| {
                    actix_web::error::ErrorInternalServerError(
                        "Authentication middleware is not installed",
                    )
                }),
        )
    }
}

/// The authenticated principal
///
/// Extraction fails with [`Unauthenticated`] when the request carries no
/// identity; use `Option<Identity>` for routes open to anonymous clients.
#[derive(Debug, Clone)]
pub struct Identity(Arc<IdentityRecord>);

impl Identity {
    pub fn new(identity: Arc<IdentityRecord>) -> Self {
        Self(identity)
    }

    pub fn into_inner(self) -> Arc<IdentityRecord> {
        self.0
    }
}

impl Deref for Identity {
    type Target = IdentityRecord;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Identity>()
                .cloned()
                .ok_or_else(|| Unauthenticated::new().into()),
        )
    }
}
