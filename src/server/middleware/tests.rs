//! Middleware tests

#[cfg(test)]
mod tests {
    use super::super::helpers::{
        build_auth_request, has_parsable_body, redirect_location, request_url,
    };
    use actix_web::http::Method;
    use actix_web::test::TestRequest;
    use serde_json::json;

    #[test]
    fn test_redirect_location_without_query_param() {
        assert_eq!(
            redirect_location("/users/login", None, "http://localhost/testpath"),
            "/users/login"
        );
    }

    #[test]
    fn test_redirect_location_appends_original_url() {
        assert_eq!(
            redirect_location("/users/login", Some("redirect"), "http://localhost/testpath"),
            "/users/login?redirect=http%3A%2F%2Flocalhost%2Ftestpath"
        );
    }

    #[test]
    fn test_redirect_location_keeps_query_and_fragment() {
        assert_eq!(
            redirect_location(
                "/users/login?hello=world#frag",
                Some("redirect"),
                "http://localhost/testpath"
            ),
            "/users/login?hello=world&redirect=http%3A%2F%2Flocalhost%2Ftestpath#frag"
        );
    }

    #[test]
    fn test_redirect_location_encodes_original_query() {
        assert_eq!(
            redirect_location("/login#top", Some("next"), "http://localhost/a?b=1&c=2"),
            "/login?next=http%3A%2F%2Flocalhost%2Fa%3Fb%3D1%26c%3D2#top"
        );
    }

    #[test]
    fn test_request_url_is_absolute() {
        let req = TestRequest::get()
            .uri("/testpath?x=1")
            .insert_header(("host", "localhost"))
            .to_srv_request();
        assert_eq!(request_url(&req), "http://localhost/testpath?x=1");
    }

    #[test]
    fn test_build_auth_request_reads_body_and_cookies() {
        let req = TestRequest::default()
            .method(Method::POST)
            .uri("/login")
            .insert_header(("host", "localhost"))
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .insert_header(("cookie", "CookieAuth=abc"))
            .to_srv_request();

        let auth_request =
            build_auth_request(&req, b"username=mariano&password=password").unwrap();

        assert_eq!(auth_request.method(), &Method::POST);
        assert_eq!(auth_request.path(), "/login");
        assert_eq!(auth_request.cookie("CookieAuth"), Some("abc"));
        assert_eq!(auth_request.body_field("username"), Some(&json!("mariano")));
    }

    #[test]
    fn test_only_credential_bodies_are_buffered() {
        let form = TestRequest::post()
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .to_srv_request();
        assert!(has_parsable_body(form.headers()));

        let upload = TestRequest::post()
            .insert_header(("content-type", "application/octet-stream"))
            .to_srv_request();
        assert!(!has_parsable_body(upload.headers()));

        let bare = TestRequest::post().to_srv_request();
        assert!(!has_parsable_body(bare.headers()));
    }
}
