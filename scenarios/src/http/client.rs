//! HttpClient trait definition

use async_trait::async_trait;
use std::sync::Arc;

use super::types::{HttpRequest, HttpResponse, TransportError};

/// Trait for HTTP transports used by scenarios
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Issue a request and wait for the full response body.
    ///
    /// Any status code is a successful send; only transport problems
    /// (connect, timeout, reading the body) are errors.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpClient + ?Sized> HttpClient for Arc<T> {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        (**self).send(request).await
    }
}
