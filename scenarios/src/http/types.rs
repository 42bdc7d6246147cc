//! Request/response types and transport errors

use bytes::Bytes;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Errors that prevent a response from being received
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Failed to connect to {url}: {message}")]
    Connect { url: String, message: String },

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },
}

/// HTTP methods used by scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::Post, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::Delete, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Set a JSON body and the matching `Content-Type` header
    pub fn json(self, body: serde_json::Value) -> Self {
        let mut req = self.header("Content-Type", "application/json");
        req.body = Some(body.to_string());
        req
    }

    /// First header value with a case-insensitive name match
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Request path without scheme, host or query string
    pub fn path(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        let path = without_scheme
            .find('/')
            .map(|idx| &without_scheme[idx..])
            .unwrap_or("/");
        path.split(['?', '#']).next().unwrap_or(path)
    }
}

/// A received response with its full body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Bytes,
    /// Time from send until the body was read
    pub duration: Duration,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
            duration: Duration::ZERO,
        }
    }

    /// Parse the body as JSON
    pub fn json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::from_slice(&self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_body_sets_content_type() {
        let req = HttpRequest::post("http://localhost/api/pizza")
            .json(json!({"stars": 5}))
            .header("authorization", "Token abc");
        assert_eq!(req.header_value("content-type"), Some("application/json"));
        assert_eq!(req.header_value("Authorization"), Some("Token abc"));
        assert_eq!(req.body.as_deref(), Some(r#"{"stars":5}"#));
    }

    #[test]
    fn test_request_path() {
        assert_eq!(HttpRequest::get("https://example.com/posts/42").path(), "/posts/42");
        assert_eq!(HttpRequest::get("http://example.com").path(), "/");
        assert_eq!(HttpRequest::get("http://h:1/a/b?x=1").path(), "/a/b");
    }

    #[test]
    fn test_response_json() {
        let resp = HttpResponse::new(201, r#"{"id":42}"#);
        assert_eq!(resp.json().unwrap()["id"], 42);

        let bad = HttpResponse::new(200, "<html>");
        assert!(bad.json().is_err());
    }
}
