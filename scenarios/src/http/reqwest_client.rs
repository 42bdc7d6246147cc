//! reqwest-backed HttpClient

use async_trait::async_trait;
use std::time::Instant;
use tracing::debug;

use super::client::HttpClient;
use super::types::{HttpRequest, HttpResponse, Method, TransportError};
use crate::config::HttpConfig;
use crate::profile::builtin;

/// HTTP client shared by all virtual users.
///
/// Cloning is cheap and reuses the same connection pool. Every request is
/// reported to the `metrics` facade as `http_reqs`, `http_req_duration`
/// (milliseconds) and, for transport errors or status >= 400, `http_req_failed`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    inner: reqwest::Client,
}

impl ReqwestClient {
    /// Build a client from configuration
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { inner })
    }

    fn map_error(url: &str, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_connect() {
            TransportError::Connect {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            TransportError::Request {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    fn record(method: Method, elapsed_ms: f64, failed: bool) {
        metrics::counter!(builtin::HTTP_REQS, "method" => method.as_str()).increment(1);
        metrics::histogram!(builtin::HTTP_REQ_DURATION, "method" => method.as_str())
            .record(elapsed_ms);
        if failed {
            metrics::counter!(builtin::HTTP_REQ_FAILED, "method" => method.as_str()).increment(1);
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.inner.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let start = Instant::now();
        let result = async {
            let resp = builder.send().await?;
            let status = resp.status().as_u16();
            let body = resp.bytes().await?;
            Ok::<_, reqwest::Error>((status, body))
        }
        .await;
        let duration = start.elapsed();
        let elapsed_ms = duration.as_secs_f64() * 1000.0;

        match result {
            Ok((status, body)) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    status,
                    elapsed_ms,
                    "HTTP request completed"
                );
                Self::record(request.method, elapsed_ms, status >= 400);
                Ok(HttpResponse {
                    status,
                    body,
                    duration,
                })
            }
            Err(e) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    error = %e,
                    "HTTP request failed"
                );
                Self::record(request.method, elapsed_ms, true);
                Err(Self::map_error(&request.url, e))
            }
        }
    }
}
