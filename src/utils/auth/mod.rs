//! Security utilities

pub mod crypto;

pub use crypto::*;
