//! Utility modules
//!
//! - **auth**: password hashing and keyed tokens
//! - **error**: error types and their HTTP mappings

pub mod auth;
pub mod error;
