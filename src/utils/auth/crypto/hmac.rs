//! Keyed tokens used to bind remember-me cookies to a principal

use crate::utils::error::{AuthError, Result};
use hmac::{Hmac, Mac, digest::KeyInit as HmacKeyInit};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Sign `parts` with `secret`, hex encoded
///
/// Each part is prefixed with its length, so `["ab", "c"]` and `["a", "bc"]`
/// sign differently.
pub fn sign_token(secret: &str, parts: &[&str]) -> Result<String> {
    let mut mac = <HmacSha256 as HmacKeyInit>::new_from_slice(secret.as_bytes())
        .map_err(|e| AuthError::crypto(format!("Invalid HMAC key: {}", e)))?;

    for part in parts {
        mac.update(&(part.len() as u64).to_be_bytes());
        mac.update(part.as_bytes());
    }
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Check a token produced by [`sign_token`] without leaking timing
pub fn verify_token(secret: &str, parts: &[&str], token: &str) -> Result<bool> {
    let expected = sign_token(secret, parts)?;
    Ok(constant_time_eq(expected.as_bytes(), token.as_bytes()))
}

/// Constant-time byte comparison
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
