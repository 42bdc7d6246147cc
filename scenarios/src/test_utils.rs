//! Test Utilities Module
//!
//! Provides a scripted in-memory `HttpClient` for unit-testing scenarios.
//! This module is only compiled when running tests.

#![cfg(test)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::http::{HttpClient, HttpRequest, HttpResponse, Method, TransportError};

/// Stub transport that answers by `(method, path)` and records every request.
///
/// Unrouted requests get a 404 with an empty JSON object.
#[derive(Default)]
pub struct StubClient {
    routes: HashMap<(Method, String), Result<HttpResponse, TransportError>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` with `response`
    pub fn route(mut self, method: Method, path: &str, response: HttpResponse) -> Self {
        self.routes.insert((method, path.to_string()), Ok(response));
        self
    }

    /// Fail `method path` at the transport level
    pub fn fail(mut self, method: Method, path: &str) -> Self {
        self.routes.insert(
            (method, path.to_string()),
            Err(TransportError::Connect {
                url: path.to_string(),
                message: "connection refused".to_string(),
            }),
        );
        self
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClient for StubClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let key = (request.method, request.path().to_string());
        self.requests.lock().unwrap().push(request);
        self.routes
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(HttpResponse::new(404, "{}")))
    }
}
