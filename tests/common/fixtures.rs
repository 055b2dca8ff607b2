//! Test fixtures
//!
//! Real stores and services built from configuration, not mocks.

use actix_web::web;
use authn_chain::auth::{AuthenticationService, InMemoryCredentialStore};
use authn_chain::config::{
    AuthenticationConfig, AuthenticatorConfig, Config, IdentifierConfig, MiddlewareConfig,
    ServerConfig, UserSeed,
};
use authn_chain::server::{AppState, HttpServer};
use authn_chain::utils::auth::crypto::PasswordHasher;
use base64::{Engine as _, engine::general_purpose};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use std::sync::Arc;

pub const JWT_SECRET: &str = "integration-jwt-secret";
pub const COOKIE_SECRET: &str = "integration-cookie-secret";

/// mariano/password (id 1) and larry/secret (id 3)
pub fn users() -> Vec<UserSeed> {
    vec![
        seed(json!({"id": 1, "username": "mariano", "role": "admin"})).with_password("password"),
        seed(json!({"id": 3, "username": "larry", "firstname": "larry"})).with_password("secret"),
    ]
}

fn seed(attributes: Value) -> UserSeed {
    match attributes {
        Value::Object(map) => UserSeed::new(map),
        other => panic!("seed must be an object, got {}", other),
    }
}

fn identifiers() -> AuthenticationConfig {
    AuthenticationConfig::default()
        .identifier(IdentifierConfig::password())
        .identifier(IdentifierConfig::jwt_subject())
}

/// Form login only
pub fn form_chain() -> AuthenticationConfig {
    identifiers().authenticator(AuthenticatorConfig::form().using("Password"))
}

/// Cookie first, then form login
pub fn remember_me_chain() -> AuthenticationConfig {
    identifiers()
        .authenticator(AuthenticatorConfig::cookie(COOKIE_SECRET).using("Password"))
        .authenticator(AuthenticatorConfig::form().using("Password"))
}

/// HTTP Basic only
pub fn basic_chain() -> AuthenticationConfig {
    identifiers().authenticator(AuthenticatorConfig::http_basic().using("Password"))
}

/// JWT resolved through the subject identifier
pub fn jwt_chain() -> AuthenticationConfig {
    identifiers().authenticator(AuthenticatorConfig::jwt(JWT_SECRET).using("JwtSubject"))
}

pub fn config(authentication: AuthenticationConfig, middleware: MiddlewareConfig) -> Config {
    Config {
        server: ServerConfig::default(),
        authentication,
        middleware,
        users: users(),
    }
}

pub fn store() -> Arc<InMemoryCredentialStore> {
    Arc::new(
        InMemoryCredentialStore::from_seeds(&users(), "password", &PasswordHasher::new())
            .expect("seed store"),
    )
}

pub fn service(authentication: AuthenticationConfig) -> Arc<AuthenticationService> {
    Arc::new(AuthenticationService::from_config(&authentication, store()).expect("build service"))
}

/// Application state of the demo server for `config`
pub fn state(config: &Config) -> web::Data<AppState> {
    let server = HttpServer::new(config).expect("build server");
    web::Data::new(server.state().clone())
}

pub fn token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode token")
}

pub fn basic_header(user: &str, password: &str) -> String {
    format!(
        "Basic {}",
        general_purpose::STANDARD.encode(format!("{}:{}", user, password))
    )
}
