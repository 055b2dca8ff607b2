//! Authentication middleware integration tests
//!
//! Requests go through `actix_web::test` services wrapping the middleware,
//! either around small handlers or around the full demo application.

#[cfg(test)]
mod tests {
    use crate::common::fixtures;
    use actix_web::dev::Service;
    use actix_web::http::{StatusCode, header};
    use actix_web::{App, HttpResponse, test, web};
    use async_trait::async_trait;
    use futures::StreamExt;
    use authn_chain::auth::{AuthenticationService, CredentialRecord, CredentialStore};
    use authn_chain::config::MiddlewareConfig;
    use authn_chain::server::HttpServer;
    use authn_chain::utils::error::AuthError;
    use authn_chain::{AuthenticationContext, AuthenticationMiddleware, Identity};
    use serde_json::{Value, json};
    use std::sync::Arc;

    // ==================== Handlers ====================

    async fn protected(identity: Identity) -> HttpResponse {
        HttpResponse::Ok().json(identity.attributes())
    }

    async fn public(context: AuthenticationContext, identity: Option<Identity>) -> HttpResponse {
        let result = context.result();
        HttpResponse::Ok().json(json!({
            "identity": identity.map(|identity| Value::Object(identity.attributes().clone())),
            "valid": result.as_ref().is_some_and(|result| result.is_valid()),
            "failure": result
                .as_ref()
                .and_then(|result| result.failure_reason())
                .map(ToString::to_string),
            "authenticated_by": context.service().authenticated_by(),
        }))
    }

    async fn attribute(context: AuthenticationContext) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "name": context.identity_attribute(),
            "user": context.attribute("user").map(|identity| identity.get_str("username")),
            "identity": context.attribute("identity").is_some(),
        }))
    }

    fn middleware(
        authentication: authn_chain::config::AuthenticationConfig,
        config: MiddlewareConfig,
    ) -> AuthenticationMiddleware {
        AuthenticationMiddleware::from_provider(fixtures::service(authentication))
            .with_config(config)
    }

    fn redirecting() -> MiddlewareConfig {
        MiddlewareConfig::default()
            .with_redirect("/users/login")
            .with_query_param("redirect")
    }

    fn get(uri: &str) -> test::TestRequest {
        test::TestRequest::get()
            .uri(uri)
            .insert_header((header::HOST, "localhost"))
    }

    fn login(username: &str, password: &str, remember_me: bool) -> test::TestRequest {
        let remember_me = if remember_me { "1" } else { "0" };
        test::TestRequest::post()
            .uri("/login")
            .insert_header((header::HOST, "localhost"))
            .set_form([
                ("username", username),
                ("password", password),
                ("remember_me", remember_me),
            ])
    }

    fn set_cookie<B>(resp: &actix_web::dev::ServiceResponse<B>) -> Option<String> {
        resp.headers()
            .get(header::SET_COOKIE)
            .map(|value| value.to_str().unwrap().to_string())
    }

    // ==================== Redirects ====================

    #[actix_web::test]
    async fn test_unauthenticated_redirect_appends_original_url() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), redirecting()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let resp = test::call_service(&app, get("/testpath").to_request()).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/users/login?redirect=http%3A%2F%2Flocalhost%2Ftestpath"
        );
        assert!(test::read_body(resp).await.is_empty());
    }

    #[actix_web::test]
    async fn test_unauthenticated_redirect_keeps_query_and_fragment() {
        let config = MiddlewareConfig::default()
            .with_redirect("/users/login?hello=world#frag")
            .with_query_param("redirect");
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), config))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let resp = test::call_service(&app, get("/testpath").to_request()).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/users/login?hello=world&redirect=http%3A%2F%2Flocalhost%2Ftestpath#frag"
        );
    }

    #[actix_web::test]
    async fn test_unauthenticated_redirect_without_query_param() {
        let config = MiddlewareConfig::default().with_redirect("/users/login");
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), config))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let resp = test::call_service(&app, get("/testpath").to_request()).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/users/login"
        );
    }

    #[actix_web::test]
    async fn test_unauthenticated_redirect_under_scope_keeps_base() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), redirecting()))
                .service(web::scope("/base").route("/testpath", web::get().to(protected))),
        )
        .await;

        let resp = test::call_service(&app, get("/base/testpath").to_request()).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/users/login?redirect=http%3A%2F%2Flocalhost%2Fbase%2Ftestpath"
        );
    }

    #[actix_web::test]
    async fn test_unauthenticated_without_redirect_is_401() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), MiddlewareConfig::default()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let resp = test::call_service(&app, get("/testpath").to_request()).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().get(header::LOCATION).is_none());
        assert!(test::read_body(resp).await.is_empty());
    }

    #[actix_web::test]
    async fn test_anonymous_request_reaches_public_handler() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), redirecting()))
                .route("/public", web::get().to(public)),
        )
        .await;

        let body: Value =
            test::call_and_read_body_json(&app, get("/public").to_request()).await;

        assert_eq!(body["identity"], Value::Null);
        assert_eq!(body["valid"], json!(false));
        assert_eq!(body["failure"], Value::Null);
        assert_eq!(body["authenticated_by"], Value::Null);
    }

    #[actix_web::test]
    async fn test_wrapped_route_answers_plain_request() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), MiddlewareConfig::default()))
                .route("/", web::get().to(HttpResponse::Ok)),
        )
        .await;

        let resp = test::call_service(&app, get("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn test_large_upload_streams_past_the_middleware() {
        async fn upload(mut payload: web::Payload) -> HttpResponse {
            let mut received = 0;
            while let Some(chunk) = payload.next().await {
                received += chunk.map(|chunk| chunk.len()).unwrap_or_default();
            }
            HttpResponse::Ok().json(json!({ "received": received }))
        }

        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), MiddlewareConfig::default()))
                .route("/upload", web::post().to(upload)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/upload")
            .insert_header((header::HOST, "localhost"))
            .insert_header((header::CONTENT_TYPE, "application/octet-stream"))
            .set_payload(vec![7u8; 300 * 1024])
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["received"], json!(300 * 1024));
    }

    // ==================== Form login ====================

    #[actix_web::test]
    async fn test_form_success_publishes_identity() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), redirecting()))
                .route("/login", web::post().to(public)),
        )
        .await;

        let body: Value = test::call_and_read_body_json(
            &app,
            login("mariano", "password", false).to_request(),
        )
        .await;

        assert_eq!(body["valid"], json!(true));
        assert_eq!(body["authenticated_by"], json!("Form"));
        assert_eq!(
            body["identity"],
            json!({"id": 1, "username": "mariano", "role": "admin"})
        );
    }

    #[actix_web::test]
    async fn test_form_wrong_password_leaves_identity_absent() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), redirecting()))
                .route("/login", web::post().to(public)),
        )
        .await;

        let body: Value = test::call_and_read_body_json(
            &app,
            login("mariano", "wrong", false).to_request(),
        )
        .await;

        assert_eq!(body["valid"], json!(false));
        assert_eq!(body["identity"], Value::Null);
        assert_eq!(body["failure"], json!("credentials invalid"));
        assert_eq!(body["authenticated_by"], json!("Form"));
    }

    #[actix_web::test]
    async fn test_handler_still_reads_buffered_body() {
        async fn echo(form: web::Form<std::collections::HashMap<String, String>>) -> HttpResponse {
            HttpResponse::Ok().json(form.into_inner())
        }

        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), MiddlewareConfig::default()))
                .route("/login", web::post().to(echo)),
        )
        .await;

        let body: Value = test::call_and_read_body_json(
            &app,
            login("mariano", "password", true).to_request(),
        )
        .await;

        assert_eq!(body["username"], json!("mariano"));
        assert_eq!(body["remember_me"], json!("1"));
    }

    // ==================== HTTP Basic ====================

    #[actix_web::test]
    async fn test_basic_challenge_bypasses_handler_and_redirect() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::basic_chain(), redirecting()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let resp = test::call_service(&app, get("/testpath").to_request()).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers()
                .get(header::WWW_AUTHENTICATE)
                .unwrap()
                .to_str()
                .unwrap(),
            "Basic realm=\"localhost\""
        );
        assert!(resp.headers().get(header::LOCATION).is_none());
        assert!(test::read_body(resp).await.is_empty());
    }

    #[actix_web::test]
    async fn test_basic_wrong_password_is_challenged() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::basic_chain(), MiddlewareConfig::default()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let req = get("/testpath")
            .insert_header((header::AUTHORIZATION, fixtures::basic_header("mariano", "nope")))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert!(resp.headers().contains_key(header::WWW_AUTHENTICATE));
    }

    #[actix_web::test]
    async fn test_basic_success_reaches_protected_handler() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::basic_chain(), MiddlewareConfig::default()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let req = get("/testpath")
            .insert_header((header::AUTHORIZATION, fixtures::basic_header("larry", "secret")))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["username"], json!("larry"));
        assert!(body.get("password").is_none());
    }

    // ==================== JWT ====================

    #[actix_web::test]
    async fn test_jwt_query_parameter_resolves_identity() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::jwt_chain(), MiddlewareConfig::default()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let token = fixtures::token(json!({"sub": 3, "username": "larry"}));
        let req = get(&format!("/testpath?token={}", token)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["id"], json!(3));
        assert_eq!(body["username"], json!("larry"));
        assert!(body.get("password").is_none());
    }

    #[actix_web::test]
    async fn test_jwt_bearer_header_keeps_original_payload() {
        async fn payload(identity: Identity) -> HttpResponse {
            HttpResponse::Ok().json(identity.original_payload())
        }

        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::jwt_chain(), MiddlewareConfig::default()))
                .route("/payload", web::get().to(payload)),
        )
        .await;

        let claims = json!({"sub": 3, "id": 3, "username": "larry", "firstname": "larry"});
        let req = get("/payload")
            .insert_header((
                header::AUTHORIZATION,
                format!("Bearer {}", fixtures::token(claims.clone())),
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body, claims);
    }

    #[actix_web::test]
    async fn test_jwt_bad_signature_is_unauthenticated() {
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::jwt_chain(), MiddlewareConfig::default()))
                .route("/testpath", web::get().to(protected)),
        )
        .await;

        let req = get("/testpath?token=not.a.token").to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    // ==================== Identity attribute ====================

    #[actix_web::test]
    async fn test_custom_identity_attribute() {
        let config = MiddlewareConfig::default().with_identity_attribute("user");
        let app = test::init_service(
            App::new()
                .wrap(middleware(fixtures::form_chain(), config))
                .route("/login", web::post().to(attribute)),
        )
        .await;

        let body: Value = test::call_and_read_body_json(
            &app,
            login("mariano", "password", false).to_request(),
        )
        .await;

        assert_eq!(body["name"], json!("user"));
        assert_eq!(body["user"], json!("mariano"));
        assert_eq!(body["identity"], json!(false));
    }

    // ==================== Storage failures ====================

    struct UnavailableStore;

    #[async_trait]
    impl CredentialStore for UnavailableStore {
        async fn find_by(
            &self,
            _field: &str,
            _value: &Value,
        ) -> authn_chain::Result<Option<CredentialRecord>> {
            Err(AuthError::storage("connection refused"))
        }
    }

    #[actix_web::test]
    async fn test_store_failure_is_not_a_login_failure() {
        let service =
            AuthenticationService::from_config(&fixtures::form_chain(), Arc::new(UnavailableStore))
                .unwrap();
        let app = test::init_service(
            App::new()
                .wrap(AuthenticationMiddleware::new(service).with_config(redirecting()))
                .route("/login", web::post().to(public)),
        )
        .await;

        match app.call(login("mariano", "password", false).to_request()).await {
            Ok(resp) => panic!("expected an error, got {}", resp.status()),
            Err(err) => assert_eq!(
                err.as_response_error().status_code(),
                StatusCode::SERVICE_UNAVAILABLE
            ),
        }
    }

    // ==================== Demo application ====================

    #[actix_web::test]
    async fn test_remember_me_cookie_round_trip() {
        let config = fixtures::config(fixtures::remember_me_chain(), MiddlewareConfig::default());
        let app = test::init_service(HttpServer::create_app(fixtures::state(&config))).await;

        let resp = test::call_service(&app, login("mariano", "password", true).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let cookie = set_cookie(&resp).expect("remember-me cookie");
        assert!(cookie.starts_with("CookieAuth=%5B%22mariano%22"));
        assert!(cookie.contains("HttpOnly"));

        let value = cookie.split(';').next().unwrap().to_string();
        let req = get("/me").insert_header((header::COOKIE, value)).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["authenticated_by"], json!("Cookie"));
        assert_eq!(body["data"]["identity"]["username"], json!("mariano"));
    }

    #[actix_web::test]
    async fn test_no_cookie_without_remember_me() {
        let config = fixtures::config(fixtures::remember_me_chain(), MiddlewareConfig::default());
        let app = test::init_service(HttpServer::create_app(fixtures::state(&config))).await;

        let resp =
            test::call_service(&app, login("mariano", "password", false).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert!(set_cookie(&resp).is_none());
    }

    #[actix_web::test]
    async fn test_tampered_cookie_is_rejected() {
        let config = fixtures::config(fixtures::remember_me_chain(), MiddlewareConfig::default());
        let app = test::init_service(HttpServer::create_app(fixtures::state(&config))).await;

        let forged = "CookieAuth=%5B%22mariano%22%2C%22deadbeef%22%5D";
        let req = get("/me").insert_header((header::COOKIE, forged)).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_login_route_rejects_bad_credentials() {
        let config = fixtures::config(fixtures::form_chain(), redirecting());
        let app = test::init_service(HttpServer::create_app(fixtures::state(&config))).await;

        let resp = test::call_service(&app, login("mariano", "wrong", false).to_request()).await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(
            resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
            "/users/login?redirect=http%3A%2F%2Flocalhost%2Flogin"
        );
    }

    #[actix_web::test]
    async fn test_logout_expires_remember_me_cookie() {
        let config = fixtures::config(fixtures::remember_me_chain(), MiddlewareConfig::default());
        let app = test::init_service(HttpServer::create_app(fixtures::state(&config))).await;

        let req = test::TestRequest::post()
            .uri("/logout")
            .insert_header((header::HOST, "localhost"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let cookie = set_cookie(&resp).expect("removal cookie");
        assert!(cookie.starts_with("CookieAuth="));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[actix_web::test]
    async fn test_health_is_public() {
        let config = fixtures::config(fixtures::form_chain(), redirecting());
        let app = test::init_service(HttpServer::create_app(fixtures::state(&config))).await;

        let body: Value = test::call_and_read_body_json(&app, get("/health").to_request()).await;

        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["status"], json!("healthy"));
        assert_eq!(body["data"]["authenticators"], json!("Form"));
    }
}
