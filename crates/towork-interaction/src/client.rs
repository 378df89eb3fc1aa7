//! Shared HTTP client used by every typed API.

use crate::http::{ApiRequest, HttpTransport, Method, RawResponse, RequestInterceptor, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use towork_core::envelope::Envelope;
use towork_core::{Result, ToworkError};

/// Base URL, transport and interceptor chain.
///
/// Cheap to clone; each typed API holds its own copy.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    interceptors: Vec<Arc<dyn RequestInterceptor>>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            interceptors: Vec::new(),
        }
    }

    /// Appends an interceptor to the chain.
    pub fn with_interceptor(mut self, interceptor: Arc<dyn RequestInterceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn request(&self, method: Method, path: &str) -> ApiRequest {
        ApiRequest::new(method, self.url(path))
    }

    pub fn get(&self, path: &str) -> ApiRequest {
        self.request(Method::GET, path)
    }

    pub fn post(&self, path: &str) -> ApiRequest {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> ApiRequest {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> ApiRequest {
        self.request(Method::DELETE, path)
    }

    /// Runs the interceptor chain and the transport.
    ///
    /// # Returns
    ///
    /// The decoded JSON body (`Null` for an empty one) of a 2xx answer. Any
    /// other status becomes an `Api` or `Unauthorized` error carrying the
    /// backend message when one can be read.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Value> {
        for interceptor in &self.interceptors {
            interceptor.on_request(&mut request);
        }

        tracing::debug!("{} {}", request.method, request.path());
        let response = match self.transport.execute(&request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("{} {} failed: {}", request.method, request.path(), e);
                return Err(e);
            }
        };

        let status = StatusCode::from_u16(response.status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        for interceptor in &self.interceptors {
            interceptor.on_response(&request, status);
        }

        if !response.is_success() {
            tracing::warn!(
                "{} {} answered {}",
                request.method,
                request.path(),
                response.status
            );
            return Err(map_http_error(&response));
        }

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| {
            tracing::warn!("Unreadable body from {}: {}", request.path(), e);
            ToworkError::from(e)
        })
    }

    /// Sends and parses the `{success, message, data}` envelope.
    pub async fn send_envelope<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Envelope<T>> {
        let body = self.send(request).await?;
        if body.is_null() {
            return Ok(Envelope {
                success: true,
                message: String::new(),
                data: None,
            });
        }
        Ok(serde_json::from_value(body)?)
    }

    /// Sends and returns the envelope payload, which must be present.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest, fallback: &str) -> Result<T> {
        self.send_envelope(request).await?.into_data(fallback)
    }

    /// Sends and returns the envelope payload, if any.
    pub async fn fetch_optional<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        fallback: &str,
    ) -> Result<Option<T>> {
        self.send_envelope(request).await?.into_optional(fallback)
    }

    /// Sends an action call and returns the backend confirmation message.
    pub async fn execute(&self, request: ApiRequest, fallback: &str) -> Result<String> {
        let envelope: Envelope<Value> = self.send_envelope(request).await?;
        let message = if envelope.message.trim().is_empty() {
            fallback.to_string()
        } else {
            envelope.message.clone()
        };
        envelope.into_optional(fallback)?;
        Ok(message)
    }

    /// Sends and returns the raw payload for lenient mapping.
    pub async fn fetch_value(&self, request: ApiRequest, fallback: &str) -> Result<Option<Value>> {
        self.fetch_optional::<Value>(request, fallback).await
    }

    /// For endpoints answering either an envelope or the bare DTO.
    pub async fn fetch_lenient<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
        success_message: &str,
        fallback: &str,
    ) -> Result<T> {
        let body = self.send(request).await?;
        Envelope::<T>::from_lenient(body, success_message)?.into_data(fallback)
    }
}

/// Maps a non-2xx exchange to an error, preferring the backend's message.
fn map_http_error(response: &RawResponse) -> ToworkError {
    let message = serde_json::from_str::<Value>(&response.body)
        .ok()
        .and_then(|body| {
            ["message", "error"].into_iter().find_map(|key| {
                body.get(key)
                    .and_then(Value::as_str)
                    .filter(|text| !text.trim().is_empty())
                    .map(str::to_string)
            })
        })
        .unwrap_or_else(|| {
            let text = response.body.trim();
            if text.is_empty() || text.len() > 200 || text.starts_with('<') {
                format!("HTTP {}", response.status)
            } else {
                text.to_string()
            }
        });

    match response.status {
        401 | 403 => ToworkError::Unauthorized {
            status: response.status,
            message,
        },
        status => ToworkError::api(Some(status), message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_message_wins() {
        let error = map_http_error(&RawResponse::new(
            400,
            r#"{"success":false,"message":"Email déjà utilisé"}"#,
        ));
        assert_eq!(error.user_message("x"), "Email déjà utilisé");
        assert_eq!(error.status(), Some(400));
    }

    #[test]
    fn auth_statuses_are_unauthorized() {
        let error = map_http_error(&RawResponse::new(403, ""));
        assert!(error.is_unauthorized());
        assert_eq!(error.to_string(), "Unauthorized (403): HTTP 403");
    }

    #[test]
    fn html_bodies_are_not_surfaced() {
        let error = map_http_error(&RawResponse::new(502, "<html>Bad gateway</html>"));
        assert_eq!(error.user_message("fallback"), "HTTP 502");
    }
}
