//! Error handling for the authentication engine
//!
//! This module defines the error types used throughout the crate.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;
mod unauthenticated;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{AuthError, Result};
pub use unauthenticated::Unauthenticated;
