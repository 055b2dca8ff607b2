//! Seed users for the in-memory credential store

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One user loaded into the in-memory store at startup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSeed {
    /// Plaintext password, hashed when the store is built
    #[serde(default, skip_serializing)]
    pub password: Option<String>,
    /// Every other column (`id`, `username`, ...)
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl UserSeed {
    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            password: None,
            attributes,
        }
    }

    pub fn with_password<S: Into<String>>(mut self, password: S) -> Self {
        self.password = Some(password.into());
        self
    }
}
