//! Configuration data models
//!
//! This module defines all configuration structures used by the service.

#![allow(missing_docs)]

pub mod auth;
pub mod middleware;
pub mod server;
pub mod users;

// Re-export all configuration types
pub use auth::*;
pub use middleware::*;
pub use server::*;
pub use users::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

pub fn default_true() -> bool {
    true
}

pub fn default_username_field() -> String {
    "username".to_string()
}

pub fn default_password_field() -> String {
    "password".to_string()
}

pub fn default_id_field() -> String {
    "id".to_string()
}

pub fn default_hidden_fields() -> Vec<String> {
    vec![default_password_field()]
}

pub fn default_subject_claim() -> String {
    "sub".to_string()
}

pub fn default_token_header() -> String {
    "Authorization".to_string()
}

pub fn default_token_prefix() -> String {
    "Bearer".to_string()
}

pub fn default_token_query_param() -> Option<String> {
    Some("token".to_string())
}

pub fn default_jwt_algorithm() -> String {
    "HS256".to_string()
}

pub fn default_cookie_name() -> String {
    "CookieAuth".to_string()
}

pub fn default_cookie_path() -> String {
    "/".to_string()
}

pub fn default_remember_me_field() -> String {
    "remember_me".to_string()
}

pub fn default_identity_attribute() -> String {
    "identity".to_string()
}
