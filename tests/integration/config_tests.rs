//! Configuration integration tests
//!
//! Loading from disk and turning configuration into a running chain.

#[cfg(test)]
mod tests {
    use crate::common::fixtures;
    use crate::{assert_err, assert_ok};
    use authn_chain::config::{AuthenticatorConfig, Config, IdentifierConfig, MiddlewareConfig};
    use authn_chain::server::{HttpServer, ServerBuilder};
    use authn_chain::utils::error::AuthError;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    fn sample_config_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/authn.yaml")
    }

    #[tokio::test]
    async fn test_sample_config_builds_server() {
        let config = assert_ok!(Config::from_file(sample_config_path()).await);

        assert_eq!(config.users.len(), 2);
        assert_eq!(
            config.middleware.unauthenticated_redirect.as_deref(),
            Some("/login")
        );

        let server = assert_ok!(HttpServer::new(&config));
        assert_eq!(
            server.state().auth.authenticators().names(),
            vec!["Cookie", "Form", "Jwt"]
        );
        assert_eq!(
            server.state().auth.identifiers().names(),
            vec!["Password", "JwtSubject"]
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_config_error() {
        let err = assert_err!(Config::from_file("does/not/exist.yaml").await);
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[tokio::test]
    async fn test_unknown_identifier_reference_fails_at_load() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
authentication:
  identifiers:
    - type: password
  authenticators:
    - type: form
      identifier: Ldap
"#
        )
        .unwrap();

        let err = assert_err!(Config::from_file(file.path()).await);
        assert!(err.is_misconfiguration());
        assert!(err.to_string().contains("Ldap"));
    }

    #[test]
    fn test_builder_requires_config() {
        let err = assert_err!(ServerBuilder::new().build());
        assert!(matches!(err, AuthError::Config(_)));
    }

    #[test]
    fn test_builder_overrides_bind_address() {
        let config = fixtures::config(fixtures::form_chain(), MiddlewareConfig::default());
        let server = assert_ok!(
            ServerBuilder::new()
                .with_config(config)
                .with_host("127.0.0.1")
                .with_port(9001)
                .build()
        );

        assert_eq!(server.config().address(), "127.0.0.1:9001");
    }

    #[test]
    fn test_builder_rejects_empty_chain() {
        let config = fixtures::config(
            authn_chain::config::AuthenticationConfig::default()
                .identifier(IdentifierConfig::password()),
            MiddlewareConfig::default(),
        );

        let err = assert_err!(ServerBuilder::new().with_config(config).build());
        assert!(err.is_misconfiguration());
    }

    #[test]
    fn test_serialized_config_omits_seed_passwords() {
        let config = fixtures::config(
            authn_chain::config::AuthenticationConfig::default()
                .identifier(IdentifierConfig::password())
                .authenticator(AuthenticatorConfig::form()),
            MiddlewareConfig::default(),
        );

        let yaml = assert_ok!(config.to_yaml());
        let reparsed = assert_ok!(Config::from_yaml(&yaml));

        assert_eq!(reparsed.users.len(), 2);
        assert!(reparsed.users.iter().all(|user| user.password.is_none()));
        assert_eq!(reparsed.users[0].attributes["username"], "mariano");
    }
}
