//! Error types for the authentication engine

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AuthError>;

/// Main error type
///
/// Authentication *failure* is never represented here: a wrong password or a
/// bad token is an [`AuthenticationResult`](crate::auth::AuthenticationResult)
/// with a failure status. This enum only carries misconfiguration and
/// infrastructure problems.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Invalid or incomplete configuration, detected at construction
    #[error("Configuration error: {0}")]
    Config(String),

    /// A strategy referenced an identifier that is not registered
    #[error("Unknown identifier: {0}")]
    UnknownIdentifier(String),

    /// A lookup named an authenticator that is not in the chain
    #[error("Unknown authenticator: {0}")]
    UnknownAuthenticator(String),

    /// Two chain members were registered under the same name
    #[error("Duplicate registration: {0}")]
    Duplicate(String),

    /// The credential store could not be reached or returned garbage
    #[error("Credential storage error: {0}")]
    Storage(String),

    /// Hashing or signing primitives failed
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// JWT key material errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed inbound request data
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}
