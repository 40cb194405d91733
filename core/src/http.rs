//! HTTP request and response types described as plain data.
//!
//! # Design
//! `MainPay::build_request` produces an `HttpRequest` and
//! `MainPay::parse_response` consumes an `HttpResponse`; neither touches the
//! network. A `Transport` sits between them and performs the round trip, so
//! the request shaping and the response normalization stay deterministic and
//! testable without a server.
//!
//! `HttpRequest::path` is relative to the transport's base URL, the way a
//! client bound to a base URI resolves it.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{MainPayError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    /// Path relative to the base URL, including the version segment.
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value matching `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// The body is kept as raw bytes; UTF-8 and JSON validity are checked
/// together when `MainPay::parse_response` decodes it.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

/// Per-call options for `MainPay::request`.
///
/// Basic auth is not an option: the client always derives it from the server
/// key, and an `Authorization` header given here is dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub json: Option<Value>,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Options carrying `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(body: &T) -> Result<Self> {
        let json = serde_json::to_value(body).map_err(MainPayError::Serialize)?;
        Ok(Self {
            json: Some(json),
            ..Self::default()
        })
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn header_lookup_ignores_case() {
        let req = HttpRequest {
            method: HttpMethod::Get,
            path: "/v1/transactions".to_string(),
            headers: vec![("Content-Type".to_string(), "application/json".to_string())],
            query: Vec::new(),
            body: None,
        };
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("authorization"), None);
    }

    #[test]
    fn json_options_capture_body() {
        let opts = RequestOptions::json(&json!({"order_id": "ORDER-1"}))
            .unwrap()
            .with_header("x-trace", "abc")
            .with_query("page", "2");
        assert_eq!(opts.json, Some(json!({"order_id": "ORDER-1"})));
        assert_eq!(opts.headers, vec![("x-trace".to_string(), "abc".to_string())]);
        assert_eq!(opts.query, vec![("page".to_string(), "2".to_string())]);
    }

    #[test]
    fn unserializable_body_is_serialize_error() {
        use std::collections::HashMap;

        // JSON object keys must be strings.
        let body: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        let err = RequestOptions::json(&body).unwrap_err();
        assert!(matches!(err, MainPayError::Serialize(_)), "unexpected error: {err}");
    }

    #[test]
    fn method_renders_uppercase() {
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert_eq!(HttpMethod::Get.as_str(), "GET");
    }
}
