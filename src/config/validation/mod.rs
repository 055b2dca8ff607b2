//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `config_validators`: Server, middleware and seed user validators
//! - `auth_validators`: Identifier and authenticator chain validators
//! - `tests`: Test suite for all validators

mod auth_validators;
mod config_validators;
mod trait_def;

pub use auth_validators::parse_algorithm;
pub use trait_def::Validate;
