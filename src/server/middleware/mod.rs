//! HTTP middleware implementations

mod auth;
mod extractors;
mod helpers;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticationMiddleware, AuthenticationMiddlewareService};
pub use extractors::{AuthenticationContext, Identity};
pub use helpers::{build_auth_request, redirect_location, request_url};
