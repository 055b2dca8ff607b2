//! Authentication result and identity types

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// Raw credentials handed from a strategy to an identifier
pub type Credentials = Map<String, Value>;

/// Why a strategy rejected the credential it found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "message")]
pub enum FailureReason {
    /// The strategy's input was present but incomplete
    CredentialsMissing,
    /// Wrong password, bad signature, expired token
    CredentialsInvalid,
    /// A verified credential pointed at no known principal
    IdentityNotFound,
    /// Anything else a custom strategy wants to report
    Custom(String),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::CredentialsMissing => f.write_str("credentials missing"),
            FailureReason::CredentialsInvalid => f.write_str("credentials invalid"),
            FailureReason::IdentityNotFound => f.write_str("identity not found"),
            FailureReason::Custom(message) => f.write_str(message),
        }
    }
}

/// Outcome category of an authentication attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    Success,
    Failure(FailureReason),
    /// No credential of the expected shape was present
    Unresolved,
}

/// Result of running one strategy, or the whole chain
///
/// The identity is present if and only if the status is
/// [`AuthStatus::Success`]; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticationResult {
    status: AuthStatus,
    identity: Option<Arc<IdentityRecord>>,
    errors: Vec<String>,
}

impl AuthenticationResult {
    pub fn success(identity: IdentityRecord) -> Self {
        Self {
            status: AuthStatus::Success,
            identity: Some(Arc::new(identity)),
            errors: Vec::new(),
        }
    }

    pub fn failure(reason: FailureReason) -> Self {
        Self {
            status: AuthStatus::Failure(reason),
            identity: None,
            errors: Vec::new(),
        }
    }

    pub fn unresolved() -> Self {
        Self {
            status: AuthStatus::Unresolved,
            identity: None,
            errors: Vec::new(),
        }
    }

    /// Attach a diagnostic message. Never pass secret material here.
    pub fn with_error<S: Into<String>>(mut self, error: S) -> Self {
        self.errors.push(error.into());
        self
    }

    pub fn status(&self) -> &AuthStatus {
        &self.status
    }

    pub fn identity(&self) -> Option<&Arc<IdentityRecord>> {
        self.identity.as_ref()
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        matches!(self.status, AuthStatus::Success)
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self.status, AuthStatus::Unresolved)
    }

    pub fn failure_reason(&self) -> Option<&FailureReason> {
        match &self.status {
            AuthStatus::Failure(reason) => Some(reason),
            _ => None,
        }
    }
}

/// A resolved principal
///
/// Built by an identifier, then frozen inside an [`AuthenticationResult`].
#[derive(Clone, PartialEq, Serialize)]
pub struct IdentityRecord {
    #[serde(flatten)]
    attributes: Map<String, Value>,
    #[serde(skip)]
    key_field: String,
    #[serde(skip)]
    original_payload: Option<Map<String, Value>>,
    /// Stored password hash, kept only to bind remember-me tokens
    #[serde(skip)]
    credential_digest: Option<String>,
}

impl IdentityRecord {
    /// Default attribute holding the unique key
    pub const DEFAULT_KEY_FIELD: &'static str = "id";

    pub fn new(attributes: Map<String, Value>) -> Self {
        Self {
            attributes,
            key_field: Self::DEFAULT_KEY_FIELD.to_string(),
            original_payload: None,
            credential_digest: None,
        }
    }

    pub fn with_key_field<S: Into<String>>(mut self, key_field: S) -> Self {
        self.key_field = key_field.into();
        self
    }

    pub fn with_original_payload(mut self, payload: Map<String, Value>) -> Self {
        self.original_payload = Some(payload);
        self
    }

    pub(crate) fn with_credential_digest(mut self, digest: Option<String>) -> Self {
        self.credential_digest = digest;
        self
    }

    /// Stable unique key of the principal
    pub fn id(&self) -> Option<&Value> {
        self.attributes.get(&self.key_field)
    }

    pub fn key_field(&self) -> &str {
        &self.key_field
    }

    pub fn get(&self, attribute: &str) -> Option<&Value> {
        self.attributes.get(attribute)
    }

    /// String form of an attribute, for scalar values
    pub fn get_str(&self, attribute: &str) -> Option<String> {
        self.attributes.get(attribute).and_then(scalar_to_string)
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Raw decoded credential (e.g. JWT claims), if the strategy kept one
    pub fn original_payload(&self) -> Option<&Map<String, Value>> {
        self.original_payload.as_ref()
    }

    pub(crate) fn credential_digest(&self) -> Option<&str> {
        self.credential_digest.as_deref()
    }
}

impl fmt::Debug for IdentityRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityRecord")
            .field("attributes", &self.attributes)
            .field("key_field", &self.key_field)
            .field("original_payload", &self.original_payload)
            .field(
                "credential_digest",
                &self.credential_digest.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Render a scalar JSON value as a plain string (`3` → `"3"`)
pub fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Compare two values, treating `3` and `"3"` as the same key
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (scalar_to_string(a), scalar_to_string(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

/// Interpret a request field as a boolean flag (`"1"`, `"on"`, `true`, …)
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "" | "0" | "false" | "off" | "no"
        ),
        Value::Null => false,
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}
