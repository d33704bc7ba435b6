use std::future::Future;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};

use crate::error::WebhookError;
use crate::request::RequestSpec;

/// A response as seen by the executor: status line, headers and the fully
/// buffered body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    /// Reason phrase, empty when the status has no canonical one.
    pub status_text: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl HttpResponse {
    /// Create a response with the canonical reason phrase for `status`.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or_default().to_owned(),
            headers,
            body: body.into(),
        }
    }
}

/// Transport capability used to send a single request.
///
/// Implementations own TLS, redirects, pooling and timeouts. Returning an
/// error means no response was obtained; any status code, including 4xx and
/// 5xx, must be returned as `Ok`.
pub trait HttpClient: Send + Sync {
    fn send(
        &self,
        request: &RequestSpec,
    ) -> impl Future<Output = Result<HttpResponse, WebhookError>> + Send;
}

/// [`HttpClient`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    /// Build a client with no timeout and the default redirect policy.
    pub fn new() -> Result<Self, WebhookError> {
        Self::build(None)
    }

    /// Build a client that aborts requests after `timeout`.
    pub fn with_timeout(timeout: Duration) -> Result<Self, WebhookError> {
        Self::build(Some(timeout))
    }

    /// Wrap an existing `reqwest::Client`, e.g. to share a connection pool.
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn build(timeout: Option<Duration>) -> Result<Self, WebhookError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| WebhookError::Configuration(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    async fn send(&self, request: &RequestSpec) -> Result<HttpResponse, WebhookError> {
        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok(HttpResponse::new(status, headers, body))
    }
}
