//! Framework-neutral view of an inbound request
//!
//! Strategies read credentials from this snapshot instead of touching the
//! host framework's request type. The actix-web boundary builds one per
//! request; tests build them directly.

use crate::utils::error::{AuthError, Result};
use actix_web::http::Method;
use actix_web::http::header::{self, HeaderMap, HeaderName, HeaderValue};
use serde_json::{Map, Value};
use std::collections::HashMap;
use url::Url;

/// Snapshot of everything a strategy may read
#[derive(Debug, Clone)]
pub struct AuthRequest {
    method: Method,
    url: Url,
    headers: HeaderMap,
    cookies: HashMap<String, String>,
    body: Map<String, Value>,
}

impl AuthRequest {
    /// Create a request for an absolute URL
    pub fn new(method: Method, url: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| AuthError::bad_request(format!("Invalid request URL '{}': {}", url, e)))?;

        Ok(Self {
            method,
            url,
            headers: HeaderMap::new(),
            cookies: HashMap::new(),
            body: Map::new(),
        })
    }

    pub fn get(url: &str) -> Result<Self> {
        Self::new(Method::GET, url)
    }

    pub fn post(url: &str) -> Result<Self> {
        Self::new(Method::POST, url)
    }

    /// Add a header; a `Cookie` header also populates the cookie jar
    pub fn with_header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| AuthError::bad_request(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| AuthError::bad_request(format!("Invalid header value: {}", e)))?;

        if name == header::COOKIE {
            if let Ok(raw) = value.to_str() {
                self.cookies.extend(parse_cookie_header(raw));
            }
        }
        self.headers.append(name, value);
        Ok(self)
    }

    pub fn with_headers(mut self, headers: &HeaderMap) -> Self {
        for (name, value) in headers {
            if name == header::COOKIE {
                if let Ok(raw) = value.to_str() {
                    self.cookies.extend(parse_cookie_header(raw));
                }
            }
            self.headers.append(name.clone(), value.clone());
        }
        self
    }

    pub fn with_cookie<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    pub fn with_body_field<V: Into<Value>>(mut self, name: &str, value: V) -> Self {
        self.body.insert(name.to_string(), value.into());
        self
    }

    pub fn with_body(mut self, body: Map<String, Value>) -> Self {
        self.body = body;
        self
    }

    /// Parse a raw body according to its content type.
    ///
    /// Urlencoded forms and JSON objects are understood; anything else leaves
    /// the body empty, which simply makes body-reading strategies unresolved.
    pub fn with_raw_body(mut self, content_type: Option<&str>, raw: &[u8]) -> Self {
        self.body = parse_body(content_type, raw);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute URL of the request, as originally received
    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    pub fn body(&self) -> &Map<String, Value> {
        &self.body
    }

    pub fn body_field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }

    /// First query-string value for `name`
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }
}

/// Split a `Cookie` request header into name/value pairs
pub fn parse_cookie_header(raw: &str) -> Vec<(String, String)> {
    raw.split(';')
        .filter_map(|pair| {
            let (name, value) = pair.trim().split_once('=')?;
            let name = name.trim();
            if name.is_empty() {
                return None;
            }
            Some((name.to_string(), value.trim().trim_matches('"').to_string()))
        })
        .collect()
}

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

/// Lowercased media type without parameters
fn media_type(content_type: Option<&str>) -> String {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default()
}

/// Whether a body of this content type can carry credentials
pub fn is_parsable_content_type(content_type: Option<&str>) -> bool {
    matches!(media_type(content_type).as_str(), FORM_URLENCODED | JSON)
}

fn parse_body(content_type: Option<&str>, raw: &[u8]) -> Map<String, Value> {
    if raw.is_empty() {
        return Map::new();
    }

    match media_type(content_type).as_str() {
        FORM_URLENCODED => url::form_urlencoded::parse(raw)
            .map(|(key, value)| (key.into_owned(), Value::String(value.into_owned())))
            .collect(),
        JSON => match serde_json::from_slice::<Value>(raw) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}
