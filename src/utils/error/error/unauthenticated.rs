//! Signal raised by handlers for routes that require an identity

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use std::fmt;

/// Raised by downstream application code when a route requires
/// authentication and none succeeded.
///
/// The authentication middleware turns this into a redirect when one is
/// configured; otherwise it surfaces as a `401` with an empty body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Unauthenticated {
    message: Option<String>,
}

impl Unauthenticated {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message<S: Into<String>>(message: S) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("Authentication is required to continue")
    }

    /// Fixed status code of the signal
    pub const fn code(&self) -> u16 {
        401
    }
}

impl fmt::Display for Unauthenticated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Unauthenticated {}

impl ResponseError for Unauthenticated {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Unauthorized().finish()
    }
}
