//! Helper functions for creating specific error types

use super::types::AuthError;

impl AuthError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn unknown_identifier<S: Into<String>>(name: S) -> Self {
        Self::UnknownIdentifier(name.into())
    }

    pub fn unknown_authenticator<S: Into<String>>(name: S) -> Self {
        Self::UnknownAuthenticator(name.into())
    }

    pub fn duplicate<S: Into<String>>(name: S) -> Self {
        Self::Duplicate(name.into())
    }

    pub fn storage<S: Into<String>>(message: S) -> Self {
        Self::Storage(message.into())
    }

    pub fn crypto<S: Into<String>>(message: S) -> Self {
        Self::Crypto(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Whether this error stems from construction-time misconfiguration
    pub fn is_misconfiguration(&self) -> bool {
        matches!(
            self,
            Self::Config(_)
                | Self::UnknownIdentifier(_)
                | Self::UnknownAuthenticator(_)
                | Self::Duplicate(_)
                | Self::Yaml(_)
        )
    }
}
