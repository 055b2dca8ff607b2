//! Authentication chain configuration
//!
//! Identifiers and authenticators are declared as ordered lists. Each entry
//! carries a `type` tag selecting the implementation, an optional `name`
//! (defaulting to the type's canonical name) and type-specific options.

use super::*;
use serde::{Deserialize, Serialize};

/// Ordered identifier and authenticator declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthenticationConfig {
    /// Identifier resolvers, in registration order
    #[serde(default)]
    pub identifiers: Vec<IdentifierConfig>,
    /// Authenticator strategies, in evaluation order
    #[serde(default)]
    pub authenticators: Vec<AuthenticatorConfig>,
}

impl AuthenticationConfig {
    pub fn identifier(mut self, config: IdentifierConfig) -> Self {
        self.identifiers.push(config);
        self
    }

    pub fn authenticator(mut self, config: AuthenticatorConfig) -> Self {
        self.authenticators.push(config);
        self
    }

    /// Column the first password identifier reads hashes from
    pub fn password_field(&self) -> String {
        self.identifiers
            .iter()
            .find_map(|identifier| match &identifier.kind {
                IdentifierKind::Password(password) => Some(password.fields.password.clone()),
                _ => None,
            })
            .unwrap_or_else(default_password_field)
    }
}

// ==================== Identifiers ====================

/// One identifier declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// Registry name; defaults to the type's canonical name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(flatten)]
    pub kind: IdentifierKind,
}

impl IdentifierConfig {
    pub fn password() -> Self {
        Self {
            name: None,
            kind: IdentifierKind::Password(PasswordIdentifierConfig::default()),
        }
    }

    pub fn jwt_subject() -> Self {
        Self {
            name: None,
            kind: IdentifierKind::JwtSubject(JwtSubjectIdentifierConfig::default()),
        }
    }

    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Effective registry name
    pub fn registry_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.kind.default_name().to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IdentifierKind {
    Password(PasswordIdentifierConfig),
    JwtSubject(JwtSubjectIdentifierConfig),
}

impl IdentifierKind {
    pub fn default_name(&self) -> &'static str {
        match self {
            IdentifierKind::Password(_) => "Password",
            IdentifierKind::JwtSubject(_) => "JwtSubject",
        }
    }
}

/// Column names used by the password identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialFields {
    #[serde(default = "default_username_field")]
    pub username: String,
    #[serde(default = "default_password_field")]
    pub password: String,
}

impl Default for CredentialFields {
    fn default() -> Self {
        Self {
            username: default_username_field(),
            password: default_password_field(),
        }
    }
}

/// Username/password lookup against the credential store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PasswordIdentifierConfig {
    /// Store columns holding the login name and the password hash
    #[serde(default)]
    pub fields: CredentialFields,
}

/// Maps a verified token subject onto a stored principal
///
/// Which claim holds the subject is the JWT authenticator's `subject_key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSubjectIdentifierConfig {
    /// Store column the subject is matched against
    #[serde(default = "default_id_field")]
    pub id_field: String,
    /// Store columns never copied into the identity
    #[serde(default = "default_hidden_fields")]
    pub hidden_fields: Vec<String>,
}

impl Default for JwtSubjectIdentifierConfig {
    fn default() -> Self {
        Self {
            id_field: default_id_field(),
            hidden_fields: default_hidden_fields(),
        }
    }
}

// ==================== Authenticators ====================

/// One authenticator declaration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatorConfig {
    /// Registry name; defaults to the type's canonical name
    #[serde(default)]
    pub name: Option<String>,
    /// Identifier to delegate to; every registered identifier when absent
    #[serde(default)]
    pub identifier: Option<String>,
    #[serde(flatten)]
    pub kind: AuthenticatorKind,
}

impl AuthenticatorConfig {
    fn of(kind: AuthenticatorKind) -> Self {
        Self {
            name: None,
            identifier: None,
            kind,
        }
    }

    pub fn form() -> Self {
        Self::of(AuthenticatorKind::Form(FormAuthenticatorConfig::default()))
    }

    pub fn http_basic() -> Self {
        Self::of(AuthenticatorKind::HttpBasic(
            HttpBasicAuthenticatorConfig::default(),
        ))
    }

    pub fn jwt<S: Into<String>>(secret: S) -> Self {
        Self::of(AuthenticatorKind::Jwt(JwtAuthenticatorConfig {
            secret: Some(secret.into()),
            ..JwtAuthenticatorConfig::default()
        }))
    }

    pub fn cookie<S: Into<String>>(secret: S) -> Self {
        Self::of(AuthenticatorKind::Cookie(CookieAuthenticatorConfig {
            secret: secret.into(),
            ..CookieAuthenticatorConfig::default()
        }))
    }

    pub fn named<S: Into<String>>(mut self, name: S) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn using<S: Into<String>>(mut self, identifier: S) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    /// Effective registry name
    pub fn registry_name(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| self.kind.default_name().to_string())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthenticatorKind {
    Form(FormAuthenticatorConfig),
    HttpBasic(HttpBasicAuthenticatorConfig),
    Jwt(JwtAuthenticatorConfig),
    Cookie(CookieAuthenticatorConfig),
}

impl AuthenticatorKind {
    pub fn default_name(&self) -> &'static str {
        match self {
            AuthenticatorKind::Form(_) => "Form",
            AuthenticatorKind::HttpBasic(_) => "HttpBasic",
            AuthenticatorKind::Jwt(_) => "Jwt",
            AuthenticatorKind::Cookie(_) => "Cookie",
        }
    }
}

/// Request fields carrying username and password
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormFields {
    #[serde(default = "default_username_field")]
    pub username: String,
    #[serde(default = "default_password_field")]
    pub password: String,
}

impl Default for FormFields {
    fn default() -> Self {
        Self {
            username: default_username_field(),
            password: default_password_field(),
        }
    }
}

/// Username/password posted in the request body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormAuthenticatorConfig {
    #[serde(default)]
    pub fields: FormFields,
    /// Paths the form is accepted on; any path when empty
    #[serde(default)]
    pub login_urls: Vec<String>,
}

/// `Authorization: Basic` credentials
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpBasicAuthenticatorConfig {
    /// Challenge realm; the request host when absent
    #[serde(default)]
    pub realm: Option<String>,
    /// Do not answer failures with a `WWW-Authenticate` challenge
    #[serde(default)]
    pub skip_challenge: bool,
}

/// Signed bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtAuthenticatorConfig {
    /// Header carrying the token
    #[serde(default = "default_token_header")]
    pub header: String,
    /// Scheme prefix in front of the token
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,
    /// Query parameter carrying the token; header only when absent
    #[serde(default = "default_token_query_param")]
    pub query_param: Option<String>,
    /// Shared secret for HMAC algorithms
    #[serde(default)]
    pub secret: Option<String>,
    /// PEM public key for RSA/ECDSA algorithms
    #[serde(default)]
    pub public_key: Option<String>,
    /// Signature algorithm name
    #[serde(default = "default_jwt_algorithm")]
    pub algorithm: String,
    /// Clock skew tolerated on `exp`/`nbf`, in seconds
    #[serde(default)]
    pub leeway: u64,
    /// Expected `iss`, if any
    #[serde(default)]
    pub issuer: Option<String>,
    /// Expected `aud` values, if any
    #[serde(default)]
    pub audience: Vec<String>,
    /// Use the verified claims as the identity without an identifier lookup
    #[serde(default)]
    pub return_payload: bool,
    /// Claim holding the principal key
    #[serde(default = "default_subject_claim")]
    pub subject_key: String,
}

impl Default for JwtAuthenticatorConfig {
    fn default() -> Self {
        Self {
            header: default_token_header(),
            token_prefix: default_token_prefix(),
            query_param: default_token_query_param(),
            secret: None,
            public_key: None,
            algorithm: default_jwt_algorithm(),
            leeway: 0,
            issuer: None,
            audience: Vec::new(),
            return_payload: false,
            subject_key: default_subject_claim(),
        }
    }
}

/// Attributes of the remember-me cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieOptions {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    #[serde(default = "default_cookie_path")]
    pub path: String,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_true")]
    pub http_only: bool,
    /// `strict`, `lax` or `none`
    #[serde(default)]
    pub same_site: Option<String>,
    /// Lifetime in seconds; a session cookie when absent
    #[serde(default)]
    pub max_age: Option<i64>,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            path: default_cookie_path(),
            domain: None,
            secure: false,
            http_only: true,
            same_site: None,
            max_age: None,
        }
    }
}

/// Persistent remember-me cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieAuthenticatorConfig {
    #[serde(default)]
    pub cookie: CookieOptions,
    /// Key for the HMAC binding the cookie to the principal
    #[serde(default)]
    pub secret: String,
    /// Identity attribute written as the cookie's first element
    #[serde(default = "default_username_field")]
    pub username_field: String,
    /// Request field that opts into a remember-me cookie
    #[serde(default = "default_remember_me_field")]
    pub remember_me_field: String,
}

impl Default for CookieAuthenticatorConfig {
    fn default() -> Self {
        Self {
            cookie: CookieOptions::default(),
            secret: String::new(),
            username_field: default_username_field(),
            remember_me_field: default_remember_me_field(),
        }
    }
}
