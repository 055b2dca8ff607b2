//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::auth::{AuthenticationService, InMemoryCredentialStore};
use crate::config::{Config, ServerConfig};
use crate::server::middleware::AuthenticationMiddleware;
use crate::server::routes;
use crate::server::state::AppState;
use crate::utils::auth::crypto::PasswordHasher;
use crate::utils::error::{AuthError, Result};
use actix_web::{
    App, HttpServer as ActixHttpServer,
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::sync::Arc;
use tracing::info;

/// HTTP server
#[derive(Debug)]
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    ///
    /// Seeds the in-memory credential store from `config.users` and builds
    /// the authentication chain; any misconfiguration surfaces here.
    pub fn new(config: &Config) -> Result<Self> {
        info!("Creating HTTP server");

        let password_field = config.authentication.password_field();
        let store =
            InMemoryCredentialStore::from_seeds(&config.users, &password_field, &PasswordHasher::new())?;
        info!("Credential store seeded with {} users", store.len());

        let auth = AuthenticationService::from_config(&config.authentication, Arc::new(store))?;
        let state = AppState::new(config.clone(), auth);

        Ok(Self {
            config: config.server.clone(),
            state,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let authentication = AuthenticationMiddleware::from_provider(state.auth.clone())
            .with_config(state.config.middleware.clone());
        let payload_limit = web::PayloadConfig::new(state.config.server.max_body_size);

        App::new()
            .app_data(state)
            .app_data(payload_limit)
            .wrap(authentication)
            .wrap(Logger::default())
            .wrap(DefaultHeaders::new().add(("Server", "authn-chain")))
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();

        info!("Starting HTTP server on {}", bind_addr);

        let state = web::Data::new(self.state);

        let mut server = ActixHttpServer::new(move || Self::create_app(state.clone()));
        if let Some(workers) = self.config.workers {
            server = server.workers(workers);
        }

        let server = server
            .bind(&bind_addr)
            .map_err(|e| AuthError::internal(format!("Failed to bind {}: {}", bind_addr, e)))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| AuthError::internal(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }
}
