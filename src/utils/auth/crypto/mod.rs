//! Cryptographic helpers
//!
//! Argon2 password hashing and HMAC-SHA256 tokens. The primitives come from
//! the `argon2`, `hmac` and `sha2` crates; nothing here reimplements them.

pub mod hmac;
pub mod password;

pub use self::hmac::{sign_token, verify_token};
pub use password::PasswordHasher;
