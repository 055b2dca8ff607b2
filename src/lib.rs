//! # authn-chain
//!
//! Pluggable HTTP authentication resolution for actix-web.
//!
//! An ordered chain of authenticators (form login, HTTP Basic, JWT bearer
//! tokens, remember-me cookies) inspects each request. The first strategy
//! that finds a credential decides the outcome, delegating principal lookup
//! to identifier resolvers backed by a credential store. The outcome is
//! computed at most once per request and published to handlers through
//! request extensions.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use authn_chain::{AuthenticationMiddleware, AuthenticationService, Config, InMemoryCredentialStore};
//! use actix_web::{App, HttpServer};
//! use std::sync::Arc;
//!
//! #[actix_web::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/authn.yaml").await?;
//!     let store = Arc::new(InMemoryCredentialStore::new());
//!     let service = Arc::new(AuthenticationService::from_config(&config.authentication, store)?);
//!
//!     HttpServer::new(move || {
//!         App::new().wrap(
//!             AuthenticationMiddleware::from_provider(service.clone())
//!                 .with_config(config.middleware.clone()),
//!         )
//!     })
//!     .bind(("127.0.0.1", 8000))?
//!     .run()
//!     .await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod auth;
pub mod config;
pub mod server;
pub mod utils;

// Re-export main types
pub use auth::{
    AuthRequest, AuthStatus, AuthenticationResult, AuthenticationService,
    AuthenticationServiceProvider, Authenticator, AuthenticatorCollection, CredentialStore,
    FailureReason, Identifier, IdentifierCollection, IdentityRecord, InMemoryCredentialStore,
    ResponseModification,
};
pub use config::Config;
pub use server::middleware::{AuthenticationContext, AuthenticationMiddleware, Identity};
pub use utils::error::{AuthError, Result, Unauthenticated};

/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
