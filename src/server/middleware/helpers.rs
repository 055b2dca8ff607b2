//! Helper functions for middleware

use crate::auth::AuthRequest;
use crate::auth::request::is_parsable_content_type;
use crate::utils::error::Result;
use actix_web::dev::ServiceRequest;
use actix_web::http::header::{self, HeaderMap};
use url::form_urlencoded;

/// `Location` for an unauthenticated redirect.
///
/// With a query parameter, the original URL is appended to `base` after any
/// existing query; a fragment in `base` stays at the very end.
pub fn redirect_location(base: &str, query_param: Option<&str>, original_url: &str) -> String {
    let Some(param) = query_param else {
        return base.to_string();
    };

    let (target, fragment) = match base.split_once('#') {
        Some((target, fragment)) => (target, Some(fragment)),
        None => (base, None),
    };

    let separator = if target.contains('?') { '&' } else { '?' };
    let encoded: String = form_urlencoded::byte_serialize(original_url.as_bytes()).collect();

    let mut location = format!("{}{}{}={}", target, separator, param, encoded);
    if let Some(fragment) = fragment {
        location.push('#');
        location.push_str(fragment);
    }
    location
}

/// Absolute URL the client asked for
pub fn request_url(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    let path = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    format!("{}://{}{}", info.scheme(), info.host(), path)
}

/// Whether the middleware should buffer this request's body
pub fn has_parsable_body(headers: &HeaderMap) -> bool {
    is_parsable_content_type(content_type(headers))
}

fn content_type(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
}

/// Framework-neutral snapshot of the request, body included
pub fn build_auth_request(req: &ServiceRequest, body: &[u8]) -> Result<AuthRequest> {
    Ok(AuthRequest::new(req.method().clone(), &request_url(req))?
        .with_headers(req.headers())
        .with_raw_body(content_type(req.headers()), body))
}
