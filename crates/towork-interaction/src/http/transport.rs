use super::request::{ApiRequest, MultipartForm, RawResponse, RequestBody};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use towork_core::{Result, ToworkError};

/// Sends an [`ApiRequest`] and returns the raw exchange.
///
/// Non-2xx statuses are not errors at this level; only failures that
/// produce no response are.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse>;
}

/// Production transport over `reqwest`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// # Arguments
    ///
    /// * `timeout` - Whole-request timeout
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ToworkError::transport(format!("Failed to build HTTP client: {err}")))?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn build_form(form: &MultipartForm) -> Result<Form> {
        let mut multipart = Form::new();
        if let Some(file) = &form.file {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.file_name.clone())
                .mime_str(&file.mime_type())
                .map_err(|err| ToworkError::transport(format!("Invalid content type: {err}")))?;
            multipart = multipart.part(file.field.clone(), part);
        }
        for (name, value) in &form.fields {
            multipart = multipart.text(name.clone(), value.clone());
        }
        Ok(multipart)
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header("Accept", "application/json");

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(value),
            RequestBody::Multipart(form) => builder.multipart(Self::build_form(form)?),
        };

        let response = builder.send().await.map_err(|err| {
            ToworkError::transport(format!("Request to {} failed: {err}", request.path()))
        })?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| ToworkError::transport(format!("Failed to read response body: {err}")))?;

        Ok(RawResponse { status, body })
    }
}
