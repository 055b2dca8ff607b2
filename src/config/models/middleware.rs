//! HTTP boundary configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Settings for the authentication middleware
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Request extension name the identity is published under
    #[serde(default = "default_identity_attribute")]
    pub identity_attribute: String,
    /// Where to send unauthenticated requests instead of answering 401
    #[serde(default)]
    pub unauthenticated_redirect: Option<String>,
    /// Query parameter carrying the originally requested URL on redirect.
    /// No parameter is appended when absent.
    #[serde(default)]
    pub query_param: Option<String>,
}

impl Default for MiddlewareConfig {
    fn default() -> Self {
        Self {
            identity_attribute: default_identity_attribute(),
            unauthenticated_redirect: None,
            query_param: None,
        }
    }
}

impl MiddlewareConfig {
    pub fn with_redirect<S: Into<String>>(mut self, url: S) -> Self {
        self.unauthenticated_redirect = Some(url.into());
        self
    }

    /// Append the original URL under `param` when redirecting
    pub fn with_query_param<S: Into<String>>(mut self, param: S) -> Self {
        self.query_param = Some(param.into());
        self
    }

    pub fn with_identity_attribute<S: Into<String>>(mut self, attribute: S) -> Self {
        self.identity_attribute = attribute.into();
        self
    }
}
