//! HTTP side of the towork client.
//!
//! [`client::ApiClient`] runs each request through the interceptor chain and
//! an [`http::HttpTransport`]; the typed clients in [`api`] build on it.

pub mod api;
pub mod client;
pub mod http;

#[cfg(feature = "test-support")]
pub mod testing;

pub use client::ApiClient;
