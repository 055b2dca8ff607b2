//! Error handling utilities
//!
//! Crate-wide error enum, the unauthenticated signal raised by handlers, and
//! their HTTP mappings.

pub mod error;

pub use error::*;
