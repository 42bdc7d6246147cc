//! HTTP plumbing for scenarios
//!
//! This module provides:
//! - `HttpClient` trait abstracting the transport, so iterations can run
//!   against a stub in tests
//! - `ReqwestClient`, the real client, which also reports the built-in
//!   request metrics
//! - `HttpRequest` / `HttpResponse` value types

mod client;
mod reqwest_client;
mod types;

pub use client::HttpClient;
pub use reqwest_client::ReqwestClient;
pub use types::{HttpRequest, HttpResponse, Method, TransportError};
