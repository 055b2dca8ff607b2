//! Authentication resolution
//!
//! An [`AuthenticationService`] runs an ordered chain of [`Authenticator`]
//! strategies against an [`AuthRequest`]. The first strategy that finds a
//! credential decides the outcome; strategies delegate principal lookup to
//! [`Identifier`] resolvers.

pub mod authenticator;
pub mod identifier;
pub mod request;
pub mod response;
pub mod service;
pub mod types;


pub use authenticator::{
    Authenticator, AuthenticatorCollection, CookieAuthenticator, FormAuthenticator,
    HttpBasicAuthenticator, JwtAuthenticator,
};
pub use identifier::{
    CredentialRecord, CredentialStore, Identifier, IdentifierCollection, IdentifierSet,
    InMemoryCredentialStore, JwtSubjectIdentifier, PasswordIdentifier,
};
pub use request::AuthRequest;
pub use response::ResponseModification;
pub use service::{AuthenticationService, AuthenticationServiceProvider};
pub use types::{AuthStatus, AuthenticationResult, Credentials, FailureReason, IdentityRecord};
