//! Response changes requested by strategies
//!
//! Challenges, remember-me cookies and logout cookies are all expressed as a
//! [`ResponseModification`] which the HTTP boundary applies.

use crate::utils::error::{AuthError, Result};
use actix_web::HttpResponse;
use actix_web::cookie::Cookie;
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};

/// Status, headers and cookies to apply to an outgoing response
#[derive(Debug, Clone, Default)]
pub struct ResponseModification {
    status: Option<StatusCode>,
    headers: Vec<(HeaderName, HeaderValue)>,
    cookies: Vec<Cookie<'static>>,
}

impl ResponseModification {
    pub fn new() -> Self {
        Self::default()
    }

    /// `401` with a `WWW-Authenticate` challenge
    pub fn challenge(value: &str) -> Result<Self> {
        Self::new()
            .with_status(StatusCode::UNAUTHORIZED)
            .with_header(header::WWW_AUTHENTICATE, value)
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: &str) -> Result<Self> {
        let value = HeaderValue::from_str(value)
            .map_err(|e| AuthError::internal(format!("Invalid header value for {}: {}", name, e)))?;
        self.headers.push((name, value));
        Ok(self)
    }

    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Fold another modification into this one; a later status wins
    pub fn merge(&mut self, other: ResponseModification) {
        if other.status.is_some() {
            self.status = other.status;
        }
        self.headers.extend(other.headers);
        self.cookies.extend(other.cookies);
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.headers.is_empty() && self.cookies.is_empty()
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    pub fn headers(&self) -> &[(HeaderName, HeaderValue)] {
        &self.headers
    }

    pub fn cookies(&self) -> &[Cookie<'static>] {
        &self.cookies
    }

    /// Append headers and `Set-Cookie` lines to an existing response's headers
    pub fn apply_to(&self, headers: &mut HeaderMap) -> Result<()> {
        for (name, value) in &self.headers {
            headers.insert(name.clone(), value.clone());
        }
        for cookie in &self.cookies {
            let value = HeaderValue::from_str(&cookie.to_string())
                .map_err(|e| AuthError::internal(format!("Invalid cookie: {}", e)))?;
            headers.append(header::SET_COOKIE, value);
        }
        Ok(())
    }

    /// Build a standalone response with an empty body
    pub fn into_response(self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status.unwrap_or(StatusCode::OK));
        for (name, value) in self.headers {
            builder.insert_header((name, value));
        }
        for cookie in self.cookies {
            builder.cookie(cookie);
        }
        builder.finish()
    }
}
