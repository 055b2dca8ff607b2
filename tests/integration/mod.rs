//! Integration tests for authn-chain
//!
//! These tests drive the middleware and the demo server through real
//! services and an in-memory credential store.

pub mod config_tests;
pub mod middleware_tests;
